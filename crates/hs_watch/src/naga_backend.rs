//! GPU-less [`ShaderBackend`] that checks GLSL with naga.
//!
//! "Compiling" parses the source with naga's GLSL front end and runs the IR
//! validator. "Linking" checks that both stages have the right entry point
//! and that every fragment input location is written by the vertex stage.
//! Handles are plain counters; nothing is uploaded anywhere.

use std::collections::{BTreeSet, HashMap, HashSet};

use hs_core::{ShaderBackend, ShaderStage};
use naga::front::glsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

struct CheckedShader {
    stage: ShaderStage,
    /// Vertex: output locations. Fragment: input locations.
    interface: BTreeSet<u32>,
}

#[derive(Default)]
pub struct NagaBackend {
    next_id: u32,
    shaders: HashMap<u32, CheckedShader>,
    programs: HashSet<u32>,
}

impl NagaBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

fn naga_stage(stage: ShaderStage) -> naga::ShaderStage {
    match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    }
}

impl ShaderBackend for NagaBackend {
    type Shader = u32;
    type Program = u32;

    fn compile_shader(&mut self, source: &str, stage: ShaderStage) -> Result<u32, String> {
        let mut frontend = glsl::Frontend::default();
        let module = frontend
            .parse(&glsl::Options::from(naga_stage(stage)), source)
            .map_err(|errors| errors.emit_to_string(source))?;

        Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .map_err(|err| err.emit_to_string(source))?;

        let entry = module
            .entry_points
            .iter()
            .find(|ep| ep.stage == naga_stage(stage))
            .ok_or_else(|| format!("no {stage} entry point"))?;

        let mut interface = BTreeSet::new();
        match stage {
            ShaderStage::Vertex => {
                if let Some(result) = &entry.function.result {
                    collect_locations(&module, result.ty, result.binding.as_ref(), &mut interface);
                }
            }
            ShaderStage::Fragment => {
                for arg in &entry.function.arguments {
                    collect_locations(&module, arg.ty, arg.binding.as_ref(), &mut interface);
                }
            }
        }

        let id = self.allocate();
        self.shaders.insert(id, CheckedShader { stage, interface });
        Ok(id)
    }

    fn link_program(&mut self, vertex: u32, fragment: u32) -> Result<u32, String> {
        let vs = self
            .shaders
            .get(&vertex)
            .ok_or_else(|| format!("unknown shader {vertex}"))?;
        let fs = self
            .shaders
            .get(&fragment)
            .ok_or_else(|| format!("unknown shader {fragment}"))?;
        if vs.stage != ShaderStage::Vertex || fs.stage != ShaderStage::Fragment {
            return Err(format!(
                "expected vertex + fragment shaders, got {} + {}",
                vs.stage, fs.stage
            ));
        }

        let missing: Vec<String> = fs
            .interface
            .difference(&vs.interface)
            .map(u32::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(format!(
                "fragment input location(s) {} not written by the vertex shader",
                missing.join(", ")
            ));
        }

        let id = self.allocate();
        self.programs.insert(id);
        Ok(id)
    }

    fn delete_shader(&mut self, shader: u32) {
        self.shaders.remove(&shader);
    }

    fn delete_program(&mut self, program: u32) {
        if !self.programs.remove(&program) {
            log::warn!("Deleting unknown program {}", program);
        }
    }
}

/// User-defined locations reachable from an entry point argument or result,
/// descending into structs. Built-ins are skipped.
fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

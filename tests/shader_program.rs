// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `glow-program`.
//
// `glow-program` is free software: you can redistribute it and/or modify it under the terms of
// either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
// version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `glow-program` is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Lesser General Public License or the Mozilla Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `glow-program`. If not, see <https://www.gnu.org/licenses/>.

//! Construction and uniform behavior, exercised against an in-memory context double.

use glow_program::{ProgramError, ShaderProgram, ShaderStage};

use std::rc::Rc;

use fake::{FakeContext, UniformValue};

const VERTEX: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
out vec3 vColor;
uniform vec4 tint;
uniform bool flipY;
void main() {
    vColor = aPos;
    gl_Position = vec4(aPos, 1.0);
}
";

const FRAGMENT: &str = "#version 330 core
in vec3 vColor;
out vec4 FragColor;
uniform int texture1;
uniform float mixAmount;
void main() {
    FragColor = vec4(vColor, 1.0);
}
";

fn build(context: &Rc<FakeContext>) -> ShaderProgram<FakeContext> {
    ShaderProgram::from_source(context.clone(), VERTEX, FRAGMENT).unwrap()
}

#[test]
fn valid_pair_links_and_activates() {
    let context = Rc::new(FakeContext::new());
    let program = build(&context);

    assert_eq!(context.current_program(), None);
    program.activate();
    assert_eq!(context.current_program(), Some(program.id()));
}

#[test]
fn stage_objects_do_not_outlive_construction() {
    let context = Rc::new(FakeContext::new());
    let _program = build(&context);

    assert_eq!(context.live_shaders(), 0);
    assert_eq!(context.live_programs(), 1);
}

#[test]
fn drop_releases_the_program_handle() {
    let context = Rc::new(FakeContext::new());
    let program = build(&context);
    drop(program);

    assert_eq!(context.live_programs(), 0);
    assert_eq!(context.live_shaders(), 0);
}

#[test]
fn vertex_syntax_error_fails_construction() {
    let context = Rc::new(FakeContext::new());
    let broken = "#version 330 core\n#error deliberate\nvoid main() {}\n";

    let err = ShaderProgram::from_source(context.clone(), broken, FRAGMENT).unwrap_err();
    match err {
        ProgramError::Compile { stage, log } => {
            assert_eq!(stage, ShaderStage::Vertex);
            assert!(log.contains("#error"), "diagnostic missing from log: {log}");
        }
        other => panic!("expected a compile error, got: {other}"),
    }

    // No usable handle and no leaked stage objects.
    assert_eq!(context.live_programs(), 0);
    assert_eq!(context.live_shaders(), 0);
}

#[test]
fn fragment_syntax_error_fails_construction() {
    let context = Rc::new(FakeContext::new());
    let broken = "#version 330 core\n#error deliberate\nvoid main() {}\n";

    let err = ShaderProgram::from_source(context.clone(), VERTEX, broken).unwrap_err();
    match err {
        ProgramError::Compile { stage, log } => {
            assert_eq!(stage, ShaderStage::Fragment);
            assert!(log.contains("#error"), "diagnostic missing from log: {log}");
        }
        other => panic!("expected a compile error, got: {other}"),
    }

    assert_eq!(context.live_programs(), 0);
    assert_eq!(context.live_shaders(), 0);
}

#[test]
fn mismatched_interfaces_fail_to_link() {
    let context = Rc::new(FakeContext::new());

    // Compiles fine on its own, but consumes a varying the vertex stage never writes.
    let fragment = "#version 330 core
in vec3 vNormal;
out vec4 FragColor;
void main() {
    FragColor = vec4(vNormal, 1.0);
}
";

    let err = ShaderProgram::from_source(context.clone(), VERTEX, fragment).unwrap_err();
    match err {
        ProgramError::Link { log } => {
            assert!(log.contains("vNormal"), "diagnostic missing from log: {log}");
        }
        other => panic!("expected a link error, got: {other}"),
    }

    assert_eq!(context.live_programs(), 0);
    assert_eq!(context.live_shaders(), 0);
}

#[test]
fn uniform_values_round_trip() {
    let context = Rc::new(FakeContext::new());
    let program = build(&context);
    program.activate();

    program.set_int("texture1", 0);
    assert_eq!(
        context.uniform_value(program.id(), "texture1"),
        Some(UniformValue::Int(0))
    );

    program.set_float("mixAmount", 0.25);
    assert_eq!(
        context.uniform_value(program.id(), "mixAmount"),
        Some(UniformValue::Float(0.25))
    );

    program.set_bool("flipY", true);
    assert_eq!(
        context.uniform_value(program.id(), "flipY"),
        Some(UniformValue::Int(1))
    );
    program.set_bool("flipY", false);
    assert_eq!(
        context.uniform_value(program.id(), "flipY"),
        Some(UniformValue::Int(0))
    );

    program.set_vec4("tint", [0.0, 0.5, 0.0, 1.0]);
    assert_eq!(
        context.uniform_value(program.id(), "tint"),
        Some(UniformValue::Vec4([0.0, 0.5, 0.0, 1.0]))
    );
}

#[test]
fn absent_uniform_is_a_silent_no_op() {
    let context = Rc::new(FakeContext::new());
    let program = build(&context);
    program.activate();

    program.set_int("texture1", 3);
    program.set_int("noSuchUniform", 99);
    program.set_float("alsoMissing", 1.5);

    assert_eq!(context.uniform_value(program.id(), "noSuchUniform"), None);
    assert_eq!(context.uniform_value(program.id(), "alsoMissing"), None);
    // Nothing else was perturbed.
    assert_eq!(
        context.uniform_value(program.id(), "texture1"),
        Some(UniformValue::Int(3))
    );
}

#[test]
fn identical_sources_yield_independent_programs() {
    let context = Rc::new(FakeContext::new());
    let first = build(&context);
    let second = build(&context);

    assert_ne!(first.id(), second.id());

    first.activate();
    first.set_int("texture1", 1);
    second.activate();
    second.set_int("texture1", 2);
    assert_eq!(
        context.uniform_value(first.id(), "texture1"),
        Some(UniformValue::Int(1))
    );
    assert_eq!(
        context.uniform_value(second.id(), "texture1"),
        Some(UniformValue::Int(2))
    );

    first.activate();
    assert_eq!(context.current_program(), Some(first.id()));
    second.activate();
    assert_eq!(context.current_program(), Some(second.id()));
}

#[test]
fn uniform_writes_only_land_on_the_current_program() {
    let context = Rc::new(FakeContext::new());
    let first = build(&context);
    let second = build(&context);

    second.activate();
    first.set_int("texture1", 7);

    // The write targets the current program bind, which is not `first`; a
    // location resolved on a non-current program has no effect anywhere.
    assert_eq!(context.uniform_value(first.id(), "texture1"), None);
    assert_eq!(context.uniform_value(second.id(), "texture1"), None);

    first.activate();
    first.set_int("texture1", 7);
    assert_eq!(
        context.uniform_value(first.id(), "texture1"),
        Some(UniformValue::Int(7))
    );
}

#[test]
fn missing_source_file_fails_with_the_path() {
    let context = Rc::new(FakeContext::new());
    let missing = std::env::temp_dir().join("glow-program-does-not-exist.v.glsl");

    let err = ShaderProgram::from_paths(context, &missing, &missing).unwrap_err();
    match err {
        ProgramError::Read { path, source } => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected a read error, got: {other}"),
    }
}

#[test]
fn sources_read_from_disk_build_a_program() {
    let dir = std::env::temp_dir().join(format!("glow-program-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let vertex_path = dir.join("pair.v.glsl");
    let fragment_path = dir.join("pair.f.glsl");
    std::fs::write(&vertex_path, VERTEX).unwrap();
    std::fs::write(&fragment_path, FRAGMENT).unwrap();

    let context = Rc::new(FakeContext::new());
    let program = ShaderProgram::from_paths(context.clone(), &vertex_path, &fragment_path).unwrap();
    program.activate();
    assert_eq!(context.current_program(), Some(program.id()));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn handle_allocation_failure_surfaces_as_backend_error() {
    let context = Rc::new(FakeContext::new());
    context.fail_next_create();

    let err = ShaderProgram::from_source(context.clone(), VERTEX, FRAGMENT).unwrap_err();
    assert!(matches!(err, ProgramError::Backend(_)));
    assert_eq!(context.live_programs(), 0);
    assert_eq!(context.live_shaders(), 0);
}

mod fake {
    //! A `GpuContext` double backed by an in-memory object table.
    //!
    //! Compilation "succeeds" unless the source contains an `#error` directive, and
    //! linking checks that every varying the fragment stage consumes is written by
    //! the vertex stage. Uniform names are collected from `uniform` declarations in
    //! the attached sources.

    use glow_program::{GpuContext, ShaderStage};

    use std::cell::{Cell, RefCell};
    use std::collections::{BTreeMap, BTreeSet};
    use std::fmt;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FakeShader(u32);

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FakeProgram(u32);

    /// A resolved location: the program it was resolved on plus the uniform name.
    #[derive(Debug, Clone)]
    pub struct FakeLocation {
        program: u32,
        name: String,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum UniformValue {
        Int(i32),
        Float(f32),
        Vec4([f32; 4]),
    }

    #[derive(Debug)]
    pub struct FakeError(&'static str);

    impl fmt::Display for FakeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "fake context error: {}", self.0)
        }
    }

    impl std::error::Error for FakeError {}

    struct ShaderState {
        stage: ShaderStage,
        source: String,
        compiled: bool,
        log: String,
    }

    #[derive(Default)]
    struct ProgramState {
        attached: Vec<u32>,
        linked: bool,
        log: String,
        uniforms: BTreeMap<String, Option<UniformValue>>,
    }

    #[derive(Default)]
    struct State {
        next_id: u32,
        shaders: BTreeMap<u32, ShaderState>,
        programs: BTreeMap<u32, ProgramState>,
        current: Option<u32>,
    }

    pub struct FakeContext {
        state: RefCell<State>,
        fail_next_create: Cell<bool>,
    }

    impl FakeContext {
        pub fn new() -> Self {
            Self {
                state: RefCell::new(State::default()),
                fail_next_create: Cell::new(false),
            }
        }

        /// Make the next handle allocation fail, like a lost context would.
        pub fn fail_next_create(&self) {
            self.fail_next_create.set(true);
        }

        pub fn current_program(&self) -> Option<FakeProgram> {
            self.state.borrow().current.map(FakeProgram)
        }

        pub fn live_shaders(&self) -> usize {
            self.state.borrow().shaders.len()
        }

        pub fn live_programs(&self) -> usize {
            self.state.borrow().programs.len()
        }

        /// Query the stored value of a uniform, as the real API would with
        /// `glGetUniform`.
        pub fn uniform_value(&self, program: FakeProgram, name: &str) -> Option<UniformValue> {
            self.state
                .borrow()
                .programs
                .get(&program.0)
                .and_then(|state| state.uniforms.get(name))
                .and_then(|value| *value)
        }

        fn take_fail(&self) -> Result<(), FakeError> {
            if self.fail_next_create.replace(false) {
                Err(FakeError("out of handles"))
            } else {
                Ok(())
            }
        }
    }

    /// Names of the varyings a stage writes (`out ...;`) or consumes (`in ...;`).
    fn varyings(source: &str, direction: &str) -> BTreeSet<String> {
        source
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with(direction) && line.ends_with(';'))
            .filter_map(|line| line.split_whitespace().last())
            .map(|name| name.trim_end_matches(';').to_string())
            .collect()
    }

    /// Names declared with `uniform ...;` in a stage's source.
    fn uniform_names(source: &str) -> BTreeSet<String> {
        varyings(source, "uniform ")
    }

    impl GpuContext for FakeContext {
        type Shader = FakeShader;
        type Program = FakeProgram;
        type Uniform = FakeLocation;
        type Error = FakeError;

        fn create_shader(&self, stage: ShaderStage) -> Result<FakeShader, FakeError> {
            self.take_fail()?;
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            let id = state.next_id;
            state.shaders.insert(
                id,
                ShaderState {
                    stage,
                    source: String::new(),
                    compiled: false,
                    log: String::new(),
                },
            );
            Ok(FakeShader(id))
        }

        fn shader_source(&self, shader: FakeShader, source: &str) {
            let mut state = self.state.borrow_mut();
            let shader = state.shaders.get_mut(&shader.0).expect("unknown shader");
            shader.source = source.to_string();
        }

        fn compile_shader(&self, shader: FakeShader) {
            let mut state = self.state.borrow_mut();
            let shader = state.shaders.get_mut(&shader.0).expect("unknown shader");
            if let Some(index) = shader
                .source
                .lines()
                .position(|line| line.trim_start().starts_with("#error"))
            {
                shader.compiled = false;
                shader.log = format!(
                    "0:{}(1): error: #error directive in {} shader",
                    index + 1,
                    shader.stage
                );
            } else {
                shader.compiled = true;
                shader.log = String::new();
            }
        }

        fn shader_compile_status(&self, shader: FakeShader) -> bool {
            self.state.borrow().shaders[&shader.0].compiled
        }

        fn shader_info_log(&self, shader: FakeShader) -> String {
            self.state.borrow().shaders[&shader.0].log.clone()
        }

        fn delete_shader(&self, shader: FakeShader) {
            self.state.borrow_mut().shaders.remove(&shader.0);
        }

        fn create_program(&self) -> Result<FakeProgram, FakeError> {
            self.take_fail()?;
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            let id = state.next_id;
            state.programs.insert(id, ProgramState::default());
            Ok(FakeProgram(id))
        }

        fn attach_shader(&self, program: FakeProgram, shader: FakeShader) {
            let mut state = self.state.borrow_mut();
            let program = state.programs.get_mut(&program.0).expect("unknown program");
            program.attached.push(shader.0);
        }

        fn detach_shader(&self, program: FakeProgram, shader: FakeShader) {
            let mut state = self.state.borrow_mut();
            let program = state.programs.get_mut(&program.0).expect("unknown program");
            program.attached.retain(|id| *id != shader.0);
        }

        fn link_program(&self, program: FakeProgram) {
            let mut state = self.state.borrow_mut();

            let mut written = BTreeSet::new();
            let mut consumed = BTreeSet::new();
            let mut uniforms = BTreeSet::new();
            let mut stages_valid = true;
            for id in &state.programs[&program.0].attached {
                let shader = &state.shaders[id];
                stages_valid &= shader.compiled;
                match shader.stage {
                    ShaderStage::Vertex => written.extend(varyings(&shader.source, "out ")),
                    ShaderStage::Fragment => consumed.extend(varyings(&shader.source, "in ")),
                }
                uniforms.extend(uniform_names(&shader.source));
            }

            let unwritten: Vec<String> = consumed.difference(&written).cloned().collect();
            let program = state.programs.get_mut(&program.0).expect("unknown program");
            if !stages_valid {
                program.linked = false;
                program.log = "error: cannot link an uncompiled shader".to_string();
            } else if !unwritten.is_empty() {
                program.linked = false;
                program.log = format!(
                    "error: input {} is not an output of the previous stage",
                    unwritten.join(", ")
                );
            } else {
                program.linked = true;
                program.log = String::new();
                program.uniforms = uniforms.into_iter().map(|name| (name, None)).collect();
            }
        }

        fn program_link_status(&self, program: FakeProgram) -> bool {
            self.state.borrow().programs[&program.0].linked
        }

        fn program_info_log(&self, program: FakeProgram) -> String {
            self.state.borrow().programs[&program.0].log.clone()
        }

        fn delete_program(&self, program: FakeProgram) {
            self.state.borrow_mut().programs.remove(&program.0);
        }

        fn use_program(&self, program: Option<FakeProgram>) {
            self.state.borrow_mut().current = program.map(|program| program.0);
        }

        fn uniform_location(&self, program: FakeProgram, name: &str) -> Option<FakeLocation> {
            let state = self.state.borrow();
            let uniforms = &state.programs.get(&program.0)?.uniforms;
            uniforms.contains_key(name).then(|| FakeLocation {
                program: program.0,
                name: name.to_string(),
            })
        }

        fn set_uniform_i32(&self, location: &FakeLocation, value: i32) {
            self.store(location, UniformValue::Int(value));
        }

        fn set_uniform_f32(&self, location: &FakeLocation, value: f32) {
            self.store(location, UniformValue::Float(value));
        }

        fn set_uniform_f32_4(&self, location: &FakeLocation, value: [f32; 4]) {
            self.store(location, UniformValue::Vec4(value));
        }
    }

    impl FakeContext {
        fn store(&self, location: &FakeLocation, value: UniformValue) {
            let mut state = self.state.borrow_mut();
            // Uniform writes target the current program bind; a location from any
            // other program is rejected without effect, as the real API does.
            if state.current != Some(location.program) {
                return;
            }
            if let Some(program) = state.programs.get_mut(&location.program) {
                program.uniforms.insert(location.name.clone(), Some(value));
            }
        }
    }
}

//! A backend that records commands instead of rendering.

use super::{ProgramKind, RenderBackend, Uniform, UniformValue};

/// Handle to a surface allocated by [`RecordingBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    CreateSurface { id: SurfaceId, width: u32, height: u32 },
    BindProgram(ProgramKind),
    SetUniform(Uniform, UniformValue),
    BindTexture { uniform: Uniform, surface: SurfaceId, unit: u32 },
    SetBlending(bool),
    Blit(Option<SurfaceId>),
}

/// Headless [`RenderBackend`] that logs every call.
#[derive(Debug)]
pub struct RecordingBackend {
    commands: Vec<Command>,
    next_surface: u32,
    linear_filtering: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            next_surface: 0,
            linear_filtering: true,
        }
    }

    /// Report hardware filtering as unavailable, forcing the manual path.
    pub fn without_linear_filtering(mut self) -> Self {
        self.linear_filtering = false;
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Drop recorded commands, keeping surface numbering.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Targets of every blit, in order.
    pub fn blits(&self) -> Vec<Option<SurfaceId>> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Blit(target) => Some(*target),
                _ => None,
            })
            .collect()
    }

    /// Last value set for `uniform`, if any.
    pub fn last_uniform(&self, uniform: Uniform) -> Option<UniformValue> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::SetUniform(u, v) if *u == uniform => Some(*v),
            _ => None,
        })
    }

    /// Every value set for `uniform`, in order.
    pub fn uniform_history(&self, uniform: Uniform) -> Vec<UniformValue> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::SetUniform(u, v) if *u == uniform => Some(*v),
                _ => None,
            })
            .collect()
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for RecordingBackend {
    type Surface = SurfaceId;

    fn create_surface(&mut self, width: u32, height: u32) -> SurfaceId {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.commands.push(Command::CreateSurface { id, width, height });
        id
    }

    fn supports_linear_filtering(&self) -> bool {
        self.linear_filtering
    }

    fn bind_program(&mut self, program: ProgramKind) {
        self.commands.push(Command::BindProgram(program));
    }

    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue) {
        self.commands.push(Command::SetUniform(uniform, value));
    }

    fn bind_texture(&mut self, uniform: Uniform, surface: &SurfaceId, unit: u32) {
        self.commands.push(Command::BindTexture {
            uniform,
            surface: *surface,
            unit,
        });
    }

    fn set_blending(&mut self, enabled: bool) {
        self.commands.push(Command::SetBlending(enabled));
    }

    fn blit(&mut self, target: Option<&SurfaceId>) {
        self.commands.push(Command::Blit(target.copied()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surfaces_get_distinct_ids() {
        let mut backend = RecordingBackend::new();
        let a = backend.create_surface(4, 4);
        let b = backend.create_surface(4, 4);
        assert_ne!(a, b);
    }

    #[test]
    fn test_last_uniform_and_history() {
        let mut backend = RecordingBackend::new();
        backend.set_uniform(Uniform::Dt, 0.1f32.into());
        backend.set_uniform(Uniform::Radius, 0.5f32.into());
        backend.set_uniform(Uniform::Dt, 0.2f32.into());

        assert_eq!(backend.last_uniform(Uniform::Dt), Some(UniformValue::F32(0.2)));
        assert_eq!(backend.uniform_history(Uniform::Dt).len(), 2);
        assert_eq!(backend.last_uniform(Uniform::Point), None);
    }

    #[test]
    fn test_blits_lists_targets() {
        let mut backend = RecordingBackend::new();
        let s = backend.create_surface(2, 2);
        backend.blit(Some(&s));
        backend.blit(None);
        assert_eq!(backend.blits(), vec![Some(s), None]);
    }
}

use crate::di::descriptor::TypeRef;
use crate::error::{InjectError, Result};

/// Types currently being built on one resolution call chain.
#[derive(Debug, Default)]
pub(crate) struct ResolutionStack {
    path: Vec<TypeRef>,
}

impl ResolutionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `ty`, failing if it is already being resolved further up the chain.
    pub fn enter(&mut self, ty: TypeRef) -> Result<()> {
        if let Some(start) = self.path.iter().position(|entry| *entry == ty) {
            let cycle = self.path[start..]
                .iter()
                .chain(std::iter::once(&ty))
                .map(|entry| entry.name())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(InjectError::CircularDependency { cycle });
        }
        self.path.push(ty);
        Ok(())
    }

    pub fn leave(&mut self) {
        self.path.pop();
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

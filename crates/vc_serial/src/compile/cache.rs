use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock};

use super::converter::CompiledConverter;
use crate::hash::HashMap;
use crate::types::TypeExpr;

/// Compiled converters keyed by record type, generic arguments included.
///
/// Lookups take the read lock. Publishing takes the write lock and keeps
/// whichever converter was published first for a key.
#[derive(Default)]
pub(crate) struct ConverterCache {
    converters: RwLock<HashMap<TypeExpr, Arc<CompiledConverter>>>,
}

impl ConverterCache {
    #[inline(never)]
    pub fn get(&self, key: &TypeExpr) -> Option<Arc<CompiledConverter>> {
        self.converters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Publishes `converter` and returns the converter cached for its type,
    /// which is an earlier one if another thread published first.
    #[inline(never)]
    pub fn publish(&self, converter: CompiledConverter) -> Arc<CompiledConverter> {
        let mut converters = self
            .converters
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(published) = converters.get(converter.ty()) {
            log::trace!("dropping a concurrent build of `{}`", converter.ty());
            return published.clone();
        }

        log::debug!(
            "compiled converter for `{}` with {} fields",
            converter.ty(),
            converter.len()
        );
        let converter = Arc::new(converter);
        converters.insert(converter.ty().clone(), converter.clone());
        converter
    }

    pub fn len(&self) -> usize {
        self.converters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

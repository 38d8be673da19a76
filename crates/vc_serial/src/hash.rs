//! Hash containers used by the schema tables and the converter cache.
//!
//! `hashbrown` maps over `foldhash`'s fixed-seed state, so a table built
//! from the same declarations always iterates in the same order.

use foldhash::fast::FixedState;

pub(crate) type HashMap<K, V> = hashbrown::HashMap<K, V, FixedState>;
pub(crate) type HashSet<K> = hashbrown::HashSet<K, FixedState>;

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::HashMap;

    #[test]
    fn order_depends_on_content_only() {
        let build = || {
            let mut map: HashMap<&str, usize> = HashMap::default();
            for (index, path) in ["app::A", "app::B", "app::C", "app::D"].into_iter().enumerate() {
                map.insert(path, index);
            }
            map.into_iter().collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }
}

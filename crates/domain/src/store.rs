use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use cashdesk_core::TenantId;

/// Tenant-isolated key/value store abstraction for read models.
///
/// Every operation takes the tenant id: there is no way to read or write a
/// record without naming its partition. Callers pass the request's active
/// tenant binding, so queries are tenant-filtered at the seam.
pub trait TenantStore<K, V>: Send + Sync {
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V>;
    fn upsert(&self, tenant_id: TenantId, key: K, value: V);
    fn list(&self, tenant_id: TenantId) -> Vec<V>;

    /// Cardinality of a tenant's partition (on-demand relation counts).
    fn count(&self, tenant_id: TenantId) -> usize {
        self.list(tenant_id).len()
    }

    /// Drop all records for a tenant (rebuild support).
    fn clear_tenant(&self, tenant_id: TenantId);
}

impl<K, V, S> TenantStore<K, V> for Arc<S>
where
    S: TenantStore<K, V> + ?Sized,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V> {
        (**self).get(tenant_id, key)
    }

    fn upsert(&self, tenant_id: TenantId, key: K, value: V) {
        (**self).upsert(tenant_id, key, value)
    }

    fn list(&self, tenant_id: TenantId) -> Vec<V> {
        (**self).list(tenant_id)
    }

    fn count(&self, tenant_id: TenantId) -> usize {
        (**self).count(tenant_id)
    }

    fn clear_tenant(&self, tenant_id: TenantId) {
        (**self).clear_tenant(tenant_id)
    }
}

/// In-memory tenant-isolated store for dev/test.
///
/// Keys are ordered so `list` is deterministic across runs.
#[derive(Debug)]
pub struct InMemoryTenantStore<K, V> {
    inner: RwLock<BTreeMap<(TenantId, K), V>>,
}

impl<K: Ord, V> InMemoryTenantStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<K: Ord, V> Default for InMemoryTenantStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TenantStore<K, V> for InMemoryTenantStore<K, V>
where
    K: Clone + Ord + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(&(tenant_id, key.clone())).cloned()
    }

    fn upsert(&self, tenant_id: TenantId, key: K, value: V) {
        if let Ok(mut map) = self.inner.write() {
            map.insert((tenant_id, key), value);
        }
    }

    fn list(&self, tenant_id: TenantId) -> Vec<V> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        map.iter()
            .filter_map(|((t, _k), v)| if *t == tenant_id { Some(v.clone()) } else { None })
            .collect()
    }

    fn clear_tenant(&self, tenant_id: TenantId) {
        if let Ok(mut map) = self.inner.write() {
            map.retain(|(t, _k), _v| *t != tenant_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashdesk_core::EntityId;

    #[test]
    fn partitions_are_isolated_between_tenants() {
        let store: InMemoryTenantStore<EntityId, String> = InMemoryTenantStore::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();
        let key = EntityId::new();

        store.upsert(tenant_a, key, "a".to_string());
        store.upsert(tenant_b, key, "b".to_string());

        assert_eq!(store.get(tenant_a, &key), Some("a".to_string()));
        assert_eq!(store.get(tenant_b, &key), Some("b".to_string()));
        assert_eq!(store.list(tenant_a), vec!["a".to_string()]);
        assert_eq!(store.count(tenant_b), 1);
    }

    #[test]
    fn clear_tenant_leaves_other_partitions_intact() {
        let store: InMemoryTenantStore<EntityId, u32> = InMemoryTenantStore::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();

        store.upsert(tenant_a, EntityId::new(), 1);
        store.upsert(tenant_b, EntityId::new(), 2);
        store.clear_tenant(tenant_a);

        assert!(store.list(tenant_a).is_empty());
        assert_eq!(store.list(tenant_b), vec![2]);
    }
}

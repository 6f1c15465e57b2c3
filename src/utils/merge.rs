use crate::error::{ResolverError, Result};
use crate::models::ProviderValues;

/// Fold provider maps ordered by increasing specificity.
///
/// Each later map overwrites the whole value of every provider it defines.
/// Providers it does not define keep the value from the less specific layers,
/// so an empty layer is a no-op. Values are never compared.
pub fn merge_up<'a, I>(layers: I) -> ProviderValues
where
    I: IntoIterator<Item = &'a ProviderValues>,
{
    let mut value_by_provider = ProviderValues::new();
    for layer in layers {
        value_by_provider.extend(layer.iter().map(|(provider, value)| (*provider, *value)));
    }
    value_by_provider
}

/// Reject a merged map that still carries an unresolved DEFAULT.
pub fn ensure_resolved(values: &ProviderValues) -> Result<()> {
    match values.iter().find(|(_, value)| value.is_default()) {
        Some((provider, _)) => Err(ResolverError::Integrity(format!(
            "DEFAULT value for provider {} survived resolution",
            provider
        ))),
        None => Ok(()),
    }
}

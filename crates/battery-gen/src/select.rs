use crate::catalog::ExperimentCatalog;
use crate::descriptor::ExperimentDescriptor;

/// Filters the catalog down to the requested experiments.
///
/// With no request the whole catalog is returned. Entries are matched on the
/// module directory name and keep catalog order; requested names without a
/// catalog entry are dropped.
pub fn select(
    catalog: &ExperimentCatalog,
    requested: Option<&[String]>,
) -> Vec<ExperimentDescriptor> {
    let Some(requested) = requested else {
        return catalog.experiments().to_vec();
    };
    let selected: Vec<ExperimentDescriptor> = catalog
        .experiments()
        .iter()
        .filter(|exp| requested.iter().any(|name| name == exp.dir_name()))
        .cloned()
        .collect();
    for name in requested {
        if !selected.iter().any(|exp| exp.dir_name() == name) {
            tracing::debug!(experiment = %name, "requested experiment not in catalog");
        }
    }
    selected
}

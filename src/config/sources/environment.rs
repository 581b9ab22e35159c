//! Environment source: TREECLONE_<SECTION>__<KEY>, e.g. TREECLONE_DRIVE__PAGE_SIZE

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("TREECLONE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}

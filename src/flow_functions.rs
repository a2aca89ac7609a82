//! Script-facing functions, in the shape the flowscript framework calls them:
//! plain arguments in, a single int or float out.

use tracing::debug;

use crate::{
    host::ModHost,
    resolution::{ConfigResolver, ResolutionResult},
};


/// Width of one item section in the game's item id space.
pub const ITEM_SECTION_SIZE: i32 = 0x1000;


pub struct FlowFunctions<H>
where
    H: ModHost,
{
    resolver: ConfigResolver<H>,
}

impl<H> FlowFunctions<H>
where
    H: ModHost,
{
    pub fn new(resolver: ConfigResolver<H>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &ConfigResolver<H> {
        &self.resolver
    }

    /// `IS_MOD_ENABLED(mod_id)`: `1` if the mod is enabled, `0` otherwise.
    pub fn is_mod_enabled(&self, mod_id: &str) -> i32 {
        debug!("Mod id passed to IS_MOD_ENABLED: {}", mod_id);

        i32::from(self.resolver.host().is_mod_active(mod_id))
    }

    /// `GET_CONFIG_INT_VALUE(mod_id, setting_id)`.
    pub fn get_config_int_value(&self, mod_id: &str, setting_id: &str) -> ResolutionResult<i32> {
        debug!(
            "Mod id and config id passed to GET_CONFIG_INT_VALUE: {}, {}",
            mod_id, setting_id
        );

        let resolution = self.resolver.resolve(mod_id, setting_id, false)?;
        Ok(resolution.value.as_i32())
    }

    /// `GET_CONFIG_FLOAT_VALUE(mod_id, setting_id)`.
    pub fn get_config_float_value(&self, mod_id: &str, setting_id: &str) -> ResolutionResult<f32> {
        debug!(
            "Mod id and config id passed to GET_CONFIG_FLOAT_VALUE: {}, {}",
            mod_id, setting_id
        );

        let resolution = self.resolver.resolve(mod_id, setting_id, true)?;
        Ok(resolution.value.as_f32())
    }

    /// `SUM_ITEM_ID(section, id_in_section)`: the global item id of an item within its section.
    pub fn sum_item_id(&self, section: i32, id_in_section: i32) -> i32 {
        section
            .wrapping_mul(ITEM_SECTION_SIZE)
            .wrapping_add(id_in_section)
    }
}

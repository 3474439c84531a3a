use core::result::Result;

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::tasks::ConditionalSendFuture;
use cube_scatter::prelude::{validate_ranges, BatchOptions, ScatterRequest, DEFAULT_BASE_NAME};
use serde::{Deserialize, Serialize};

use crate::ScatterCubesRequest;

/// Asset describing a reusable scatter setup: ranges, optional count and seed, base name.
#[derive(Asset, TypePath, Clone, Debug, Serialize, Deserialize)]
pub struct ScatterPresetAsset {
    #[serde(default)]
    pub request: ScatterRequest,
    /// Fixed seed; `None` draws from the shared planner.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_base_name")]
    pub base_name: String,
}

fn default_base_name() -> String {
    DEFAULT_BASE_NAME.to_owned()
}

impl Default for ScatterPresetAsset {
    fn default() -> Self {
        Self {
            request: ScatterRequest::default(),
            seed: None,
            base_name: default_base_name(),
        }
    }
}

impl ScatterPresetAsset {
    pub fn options(&self) -> BatchOptions {
        BatchOptions::new().with_base_name(self.base_name.clone())
    }

    /// Builds the scatter request this preset describes for `entity`.
    pub fn to_request(&self, entity: Entity) -> ScatterCubesRequest {
        let request =
            ScatterCubesRequest::new(entity, self.request.clone()).with_options(self.options());
        match self.seed {
            Some(seed) => request.with_seed(seed),
            None => request,
        }
    }
}

/// Asset loader for [`ScatterPresetAsset`] using RON files with `.cubescatter` extension.
///
/// Presets with inverted ranges or an unusable base name fail to load.
#[derive(TypePath)]
pub struct ScatterPresetAssetLoader;

impl AssetLoader for ScatterPresetAssetLoader {
    type Asset = ScatterPresetAsset;
    type Settings = ();
    type Error = anyhow::Error;

    fn extensions(&self) -> &[&str] {
        &["cubescatter"]
    }

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            parse_preset(&bytes)
        })
    }
}

impl FromWorld for ScatterPresetAssetLoader {
    fn from_world(_: &mut World) -> Self {
        ScatterPresetAssetLoader
    }
}

fn parse_preset(bytes: &[u8]) -> anyhow::Result<ScatterPresetAsset> {
    let asset: ScatterPresetAsset = ron::de::from_bytes(bytes).map_err(|e| anyhow::anyhow!(e))?;
    asset.options().validate()?;
    validate_ranges(&asset.request.scale_range, &asset.request.position_range)?;
    Ok(asset)
}

#[cfg(test)]
mod tests {
    use cube_scatter::prelude::ScalarRange;

    use super::*;

    #[test]
    fn parses_full_preset() {
        let ron = br#"(
            request: (
                count: Some(50),
                scale_range: (min: 0.5, max: 1.5),
                position_range: (
                    x: (min: -10.0, max: 10.0),
                    y: (min: 0.0, max: 20.0),
                    z: (min: -10.0, max: 10.0),
                ),
            ),
            seed: Some(1234),
            base_name: "pillar",
        )"#;
        let preset = parse_preset(ron).expect("valid preset");
        assert_eq!(preset.request.count, Some(50));
        assert_eq!(preset.request.position_range.y, ScalarRange::new(0.0, 20.0));
        assert_eq!(preset.seed, Some(1234));
        assert_eq!(preset.options().cleanup_pattern(), "pillar*");

        let request = preset.to_request(Entity::PLACEHOLDER);
        assert_eq!(request.seed, Some(1234));
        assert_eq!(request.options.base_name, "pillar");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let preset = parse_preset(b"()").expect("empty preset");
        assert_eq!(preset.request, ScatterRequest::default());
        assert_eq!(preset.seed, None);
        assert_eq!(preset.base_name, DEFAULT_BASE_NAME);
    }

    #[test]
    fn inverted_ranges_fail_to_load() {
        let ron = br#"(
            request: (
                scale_range: (min: 1.5, max: 0.5),
                position_range: (
                    x: (min: -10.0, max: 10.0),
                    y: (min: 0.0, max: 20.0),
                    z: (min: -10.0, max: 10.0),
                ),
            ),
        )"#;
        assert!(parse_preset(ron).is_err());
        assert!(parse_preset(br#"(base_name: "a*b")"#).is_err());
        assert!(parse_preset(b"(seed: \"x\")").is_err());
    }
}

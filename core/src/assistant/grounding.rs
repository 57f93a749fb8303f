//! Retrieval tool selection for grounded queries.

use serde::{Deserialize, Serialize};

use crate::errors::LocationError;

/// A validated coordinate pair used to bias maps retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct GeoLocation {
    latitude: f64,
    longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(LocationError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(LocationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Deserialize)]
struct RawLocation {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawLocation> for GeoLocation {
    type Error = LocationError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmptyOptions {}

/// Serialises as the provider's `{"googleMaps": {}}` / `{"googleSearch": {}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GroundingTool {
    GoogleMaps(EmptyOptions),
    GoogleSearch(EmptyOptions),
}

impl GroundingTool {
    pub fn maps() -> Self {
        Self::GoogleMaps(EmptyOptions {})
    }

    pub fn search() -> Self {
        Self::GoogleSearch(EmptyOptions {})
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfig {
    pub lat_lng: LatLng,
}

/// Tool configuration; serialises to `{}` when there is no bias.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_config: Option<RetrievalConfig>,
}

impl ToolConfig {
    pub fn is_unbiased(&self) -> bool {
        self.retrieval_config.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroundingPlan {
    pub tools: Vec<GroundingTool>,
    pub tool_config: ToolConfig,
}

/// Decide which tools and bias accompany a grounded query.
///
/// Search is always attached. Maps is attached when requested, and the bias
/// only when a location is known; maps without a location is unbiased.
pub fn configure_grounding(use_maps_tool: bool, location: Option<GeoLocation>) -> GroundingPlan {
    if !use_maps_tool {
        return GroundingPlan {
            tools: vec![GroundingTool::search()],
            tool_config: ToolConfig::default(),
        };
    }

    let retrieval_config = location.map(|loc| RetrievalConfig {
        lat_lng: LatLng {
            latitude: loc.latitude(),
            longitude: loc.longitude(),
        },
    });

    GroundingPlan {
        tools: vec![GroundingTool::maps(), GroundingTool::search()],
        tool_config: ToolConfig { retrieval_config },
    }
}

/// A research question as submitted by the assistant panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingRequest {
    pub prompt_text: String,
    #[serde(default)]
    pub use_maps_tool: bool,
    #[serde(default)]
    pub location: Option<GeoLocation>,
}

impl GroundingRequest {
    pub fn search(prompt_text: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            use_maps_tool: false,
            location: None,
        }
    }

    pub fn with_maps(mut self, location: Option<GeoLocation>) -> Self {
        self.use_maps_tool = true;
        self.location = location;
        self
    }

    pub fn plan(&self) -> GroundingPlan {
        configure_grounding(self.use_maps_tool, self.location)
    }
}

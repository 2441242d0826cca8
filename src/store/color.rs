use super::StoreClient;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};

impl StoreClient {
    // Every color defined in the catalog
    pub async fn get_colors(&self) -> Result<Vec<Color>, ApiError> {
        self.get("/colors", &[], "Colors", "colors.json").await
    }

    pub async fn get_color(&self, id: i64) -> Result<Color, ApiError> {
        self.get(
            &format!("/colors/{}", id),
            &[],
            &format!("Color {}", id),
            &format!("color-{}.json", id),
        )
        .await
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Color {
    pub color_id: i64,
    pub color_name: String,
    // HTML color code, without the leading '#'
    pub color_code: String,
    pub color_type: ColorType,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ColorType {
    BrickArms,
    Chrome,
    Glitter,
    Metallic,
    Milky,
    Modulex,
    Pearl,
    #[default]
    Solid,
    Speckle,
    Transparent,
    #[serde(other)]
    Other,
}

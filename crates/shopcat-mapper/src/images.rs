use shopcat_core::{ImageType, MerchantStore, ProductImage, ReadableImage};

use crate::context::MappingContext;

/// Builds the public paths of catalog imagery.
pub trait ImageFilePath: Send + Sync {
    /// Prefix prepended to every path when building a full URL.
    fn context_path(&self) -> &str;

    fn product_image_path(&self, store: &MerchantStore, sku: &str, file_name: &str) -> String;

    /// Path of an option value swatch.
    fn property_image_path(&self, store: &MerchantStore, file_name: &str) -> String;
}

/// Images served from a static root, laid out by store and sku.
#[derive(Debug, Clone)]
pub struct StaticImagePaths {
    context_path: String,
}

impl StaticImagePaths {
    #[must_use]
    pub fn new(context_path: impl Into<String>) -> Self {
        let context_path = context_path.into();
        Self {
            context_path: context_path.trim_end_matches('/').to_string(),
        }
    }
}

impl ImageFilePath for StaticImagePaths {
    fn context_path(&self) -> &str {
        &self.context_path
    }

    fn product_image_path(&self, store: &MerchantStore, sku: &str, file_name: &str) -> String {
        format!("/products/{}/{sku}/{file_name}", store.code)
    }

    fn property_image_path(&self, store: &MerchantStore, file_name: &str) -> String {
        format!("/attributes/{}/{file_name}", store.code)
    }
}

/// Projects an image stored under the folder of `sku`.
#[must_use]
pub fn readable_image(image: &ProductImage, sku: &str, ctx: &MappingContext<'_>) -> ReadableImage {
    let path = ctx
        .images
        .product_image_path(ctx.store, sku, &image.file_name);
    let video_url = match image.image_type {
        ImageType::Video => image.external_url.clone(),
        ImageType::Image => None,
    };

    ReadableImage {
        id: image.id,
        image_name: image.file_name.clone(),
        image_url: format!("{}{path}", ctx.images.context_path()),
        external_url: image.external_url.clone(),
        video_url,
        image_type: image.image_type,
        default_image: image.default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{store, TestEnv};

    #[test]
    fn readable_image_prefixes_context_path() {
        let env = TestEnv::new();
        let image = ProductImage {
            id: 7,
            file_name: "front.jpg".to_string(),
            default: true,
            ..ProductImage::default()
        };
        let readable = readable_image(&image, "TSHIRT", &env.ctx());
        assert_eq!(readable.image_url, "/static/products/DEFAULT/TSHIRT/front.jpg");
        assert!(readable.default_image);
        assert!(readable.video_url.is_none());
    }

    #[test]
    fn video_exposes_external_url() {
        let env = TestEnv::new();
        let image = ProductImage {
            id: 8,
            file_name: "demo".to_string(),
            image_type: ImageType::Video,
            external_url: Some("https://video.example.com/demo".to_string()),
            ..ProductImage::default()
        };
        let readable = readable_image(&image, "TSHIRT", &env.ctx());
        assert_eq!(readable.video_url.as_deref(), Some("https://video.example.com/demo"));
        assert_eq!(readable.external_url, readable.video_url);
    }

    #[test]
    fn external_url_on_plain_image_is_not_a_video() {
        let env = TestEnv::new();
        let image = ProductImage {
            id: 9,
            file_name: "remote.jpg".to_string(),
            external_url: Some("https://cdn.example.com/remote.jpg".to_string()),
            ..ProductImage::default()
        };
        let readable = readable_image(&image, "TSHIRT", &env.ctx());
        assert!(readable.video_url.is_none());
        assert!(readable.external_url.is_some());
    }

    #[test]
    fn product_image_path_layout() {
        let paths = StaticImagePaths::new("/static/");
        assert_eq!(paths.context_path(), "/static");
        assert_eq!(
            paths.product_image_path(&store(), "TSHIRT", "front.jpg"),
            "/products/DEFAULT/TSHIRT/front.jpg"
        );
    }

    #[test]
    fn property_image_path_layout() {
        let paths = StaticImagePaths::new("");
        assert_eq!(
            paths.property_image_path(&store(), "red.png"),
            "/attributes/DEFAULT/red.png"
        );
    }
}

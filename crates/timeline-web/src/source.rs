use futures::future::{FutureExt, LocalBoxFuture};
use js_sys::{Function, Promise, Reflect};
use timeline_engine::assets::{FontDescriptor, FontHandle, VideoReadiness};
use timeline_engine::{AssetError, AssetSource, Vec2};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Asset acquisition over a JavaScript loader:
/// `loader(kind, path, reload) -> Promise<{ width, height }>`.
///
/// `kind` is `"image"`, `"video:canplaythrough"`, `"video:loadeddata"` or
/// `"font"`. Fonts resolve with anything; only rejection matters.
#[derive(Clone)]
pub struct JsAssetSource {
    loader: Function,
}

impl JsAssetSource {
    pub fn new(loader: Function) -> Self {
        Self { loader }
    }

    async fn request(&self, kind: &str, path: &str, reload: bool) -> Result<JsValue, String> {
        let value = self
            .loader
            .call3(
                &JsValue::NULL,
                &JsValue::from_str(kind),
                &JsValue::from_str(path),
                &JsValue::from_bool(reload),
            )
            .map_err(describe)?;
        let promise = value
            .dyn_into::<Promise>()
            .map_err(|_| "loader did not return a promise".to_string())?;
        JsFuture::from(promise).await.map_err(describe)
    }

    async fn natural_size(&self, kind: &str, path: &str, reload: bool) -> Result<Vec2, String> {
        let value = self.request(kind, path, reload).await?;
        let field = |name: &str| Reflect::get(&value, &JsValue::from_str(name)).ok().and_then(|v| v.as_f64());
        match (field("width"), field("height")) {
            (Some(w), Some(h)) => Ok(Vec2::new(w as f32, h as f32)),
            _ => Err("resolved without a natural size".to_string()),
        }
    }
}

fn describe(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl AssetSource for JsAssetSource {
    fn load_image(&self, path: String) -> LocalBoxFuture<'_, Result<Vec2, AssetError>> {
        async move {
            self.natural_size("image", &path, false)
                .await
                .map_err(|reason| AssetError::Image { path, reason })
        }
        .boxed_local()
    }

    fn load_video(
        &self,
        path: String,
        readiness: VideoReadiness,
        reload: bool,
    ) -> LocalBoxFuture<'_, Result<Vec2, AssetError>> {
        let kind = match readiness {
            VideoReadiness::CanPlayThrough => "video:canplaythrough",
            VideoReadiness::LoadedData => "video:loadeddata",
        };
        async move {
            self.natural_size(kind, &path, reload)
                .await
                .map_err(|reason| AssetError::Video { path, reason })
        }
        .boxed_local()
    }

    fn load_font(&self, font: FontDescriptor) -> LocalBoxFuture<'_, Result<FontHandle, AssetError>> {
        async move {
            match self.request("font", &font.path, false).await {
                Ok(_) => Ok(FontHandle {
                    family: font.family,
                    path: font.path,
                }),
                Err(reason) => Err(AssetError::Font { path: font.path, reason }),
            }
        }
        .boxed_local()
    }
}

//! Random source pictures: the remote search API and a local-file stand-in.

use std::path::PathBuf;

use crate::{
    assets::decode::decode_image,
    foundation::error::{MemeError, MemeResult},
    meme::model::{LoadedImage, SourceImage},
};

/// Supplies source pictures to the studio.
#[allow(async_fn_in_trait)]
pub trait ImageSource {
    /// Pick a random picture. Single attempt, no retry.
    async fn request_random_image(&self) -> MemeResult<SourceImage>;

    /// Download the encoded bytes behind `image`.
    async fn load_bytes(&self, image: &SourceImage) -> MemeResult<Vec<u8>>;
}

/// Request a random picture, download it and decode its pixels.
pub async fn load_random_image<I: ImageSource + ?Sized>(source: &I) -> MemeResult<LoadedImage> {
    let image = source.request_random_image().await?;
    let bytes = source.load_bytes(&image).await?;
    let pixels = decode_image(&bytes)?;
    tracing::debug!(
        id = %image.id,
        reported = ?(image.width, image.height),
        decoded = ?(pixels.width, pixels.height),
        "source image loaded"
    );
    Ok(LoadedImage {
        source: image,
        pixels,
    })
}

/// TheCatAPI-compatible search endpoint: `GET` returns a JSON array of `{id, url, width, height}`.
#[derive(Clone, Debug)]
pub struct CatApiSource {
    client: reqwest::Client,
    search_url: String,
}

impl CatApiSource {
    pub fn new(client: reqwest::Client, search_url: impl Into<String>) -> Self {
        Self {
            client,
            search_url: search_url.into(),
        }
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }
}

impl ImageSource for CatApiSource {
    #[tracing::instrument(skip(self), fields(url = %self.search_url))]
    async fn request_random_image(&self) -> MemeResult<SourceImage> {
        let response = self
            .client
            .get(&self.search_url)
            .send()
            .await
            .map_err(|e| MemeError::image_fetch(format!("search request: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(MemeError::image_fetch(format!("search returned {status}")));
        }
        let body = response
            .text()
            .await
            .map_err(|e| MemeError::image_fetch(format!("search body: {e}")))?;
        parse_search_response(&body)
    }

    #[tracing::instrument(skip(self, image), fields(url = %image.url))]
    async fn load_bytes(&self, image: &SourceImage) -> MemeResult<Vec<u8>> {
        let response = self
            .client
            .get(&image.url)
            .send()
            .await
            .map_err(|e| MemeError::image_load(format!("download {}: {e}", image.url)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(MemeError::image_load(format!(
                "download {} returned {status}",
                image.url
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| MemeError::image_load(format!("download {}: {e}", image.url)))?;
        Ok(bytes.to_vec())
    }
}

/// First element of a search response body.
pub fn parse_search_response(body: &str) -> MemeResult<SourceImage> {
    let images: Vec<SourceImage> = serde_json::from_str(body)
        .map_err(|e| MemeError::image_fetch(format!("search response: {e}")))?;
    images
        .into_iter()
        .next()
        .ok_or_else(|| MemeError::image_fetch("search response was empty"))
}

/// Serves one picture from disk, every time.
#[derive(Clone, Debug)]
pub struct LocalImageSource {
    path: PathBuf,
}

impl LocalImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSource for LocalImageSource {
    async fn request_random_image(&self) -> MemeResult<SourceImage> {
        let (width, height) = image::image_dimensions(&self.path).map_err(|e| {
            MemeError::image_fetch(format!("read '{}': {e}", self.path.display()))
        })?;
        let id = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("local")
            .to_string();
        Ok(SourceImage {
            id,
            url: format!("file://{}", self.path.display()),
            width,
            height,
        })
    }

    async fn load_bytes(&self, _image: &SourceImage) -> MemeResult<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| MemeError::image_load(format!("read '{}': {e}", self.path.display())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sources/image.rs"]
mod tests;

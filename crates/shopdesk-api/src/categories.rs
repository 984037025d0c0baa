use reqwest::Method;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::CategoryRecord;
use crate::resource::Resource;

impl ApiClient {
    /// `GET /v1/products/categories` → `data.categories`.
    pub async fn list_categories(&self) -> Result<Vec<CategoryRecord>, Error> {
        let url = self.url(&format!("{}/categories", Resource::PRODUCTS.path))?;
        let mut env = self.send(self.http().get(url.clone()), Method::GET, &url).await?;
        env.take("/data/categories")
    }
}

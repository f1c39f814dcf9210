use std::future::Future;

use url::Url;

use crate::{Claims, Error};

pub trait GeneralAuthn {
    fn issuer_url(&self) -> Url;

    fn audience(&self) -> &str;

    fn authenticate(
        &self,
        target: &http::request::Parts,
    ) -> impl Future<Output = Result<Claims, Error>>;
}

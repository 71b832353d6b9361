use thiserror::Error;
use url::Url;

use crate::session::TestType;

const BASE: &str = "proctor://local/";

/// Views the app can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Test(TestType),
    Submitted,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum RouteError {
    #[error("malformed route `{0}`")]
    Malformed(String),
    #[error("unknown route `{0}`")]
    UnknownPath(String),
    #[error("missing test type")]
    MissingTestType,
    #[error("invalid test type `{0}`")]
    InvalidTestType(String),
}

impl Route {
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let base = Url::parse(BASE).map_err(|_| RouteError::Malformed(path.to_string()))?;
        let url = base
            .join(path)
            .map_err(|_| RouteError::Malformed(path.to_string()))?;

        match url.path() {
            "/" => Ok(Route::Landing),
            "/submitted" => Ok(Route::Submitted),
            "/test" => {
                let test_type = url
                    .query_pairs()
                    .find(|(k, _)| k == "type")
                    .map(|(_, v)| v.into_owned())
                    .ok_or(RouteError::MissingTestType)?;
                test_type
                    .parse::<TestType>()
                    .map(Route::Test)
                    .map_err(RouteError::InvalidTestType)
            }
            other => Err(RouteError::UnknownPath(other.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Test(test_type) => format!("/test?type={}", test_type),
            Route::Submitted => "/submitted".to_string(),
        }
    }
}

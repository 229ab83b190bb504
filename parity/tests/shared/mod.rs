use axum::{
    Router,
    body::{Body, to_bytes},
};
use http::{Request, Response};
use tempfile::{TempDir, tempdir};
use tower::Service;

pub mod macros;

pub struct TestClient {
    router: Router,

    // hold TempDir because the temporary directory will be deleted on Drop
    _temp_dir: TempDir,
}

impl TestClient {
    pub async fn default() -> Self {
        Self::with_fixtures("").await
    }

    /// `fixtures` is a `;` separated list of SQL statements run after the
    /// migrations, before any request.
    pub async fn with_fixtures(fixtures: &str) -> Self {
        let temp_dir = tempdir().expect("unable to create temp dir");

        let database_url = {
            let path = temp_dir.path().join("test.db");
            path.to_string_lossy().to_string()
        };

        // router() connects and runs migrations
        let router = parity::router(parity::ServerOpts {
            database: parity::DatabaseConfig {
                url: database_url.clone(),
            },
            test_country_code: None,
        })
        .await
        .expect("unable to create router");

        if !fixtures.trim().is_empty() {
            let pool = parity::DatabaseConfig { url: database_url }
                .pool()
                .await
                .expect("unable to connect to test db");

            for statement in fixtures.split(';') {
                let statement = statement.trim();
                if statement.is_empty() {
                    continue;
                }
                sqlx::query(statement)
                    .execute(&pool)
                    .await
                    .expect("unable to run fixture statement");
            }

            pool.close().await;
        }

        Self {
            router,
            _temp_dir: temp_dir,
        }
    }

    pub async fn send(&mut self, request: Request<Body>) -> Asserter {
        let response = self.router
            .call(request)
            .await
            .unwrap(/* Infallible */);
        Asserter::from(response)
    }
}

pub struct Asserter {
    response: Response<Body>,
}

impl Asserter {
    pub fn inspect(self) -> Self {
        println!("{:#?}", self.response);
        self
    }

    pub fn status(self, expected: u16) -> Self {
        assert_eq!(
            self.response.status().as_u16(),
            expected,
            "expected status {}, got {}",
            expected,
            self.response.status()
        );
        self
    }

    pub fn header(self, name: &str, expected: &str) -> Self {
        let value = self
            .response
            .headers()
            .get(name)
            .unwrap_or_else(|| panic!("missing header `{name}`"));
        assert_eq!(value, expected, "unexpected value for header `{name}`");
        self
    }

    pub async fn json_body<T>(self, f: impl FnOnce(T))
    where
        T: serde::de::DeserializeOwned,
    {
        f(self.into_deserialized_json_body::<T>().await)
    }

    pub async fn into_deserialized_json_body<T>(self) -> T
    where
        T: serde::de::DeserializeOwned,
    {
        let body_bytes = to_bytes(self.response.into_body(), usize::MAX)
            .await
            .expect("unable to read response body");

        serde_json::from_slice::<T>(&body_bytes).expect("unable to deserialize response body")
    }

    pub async fn into_text_body(self) -> String {
        let body_bytes = to_bytes(self.response.into_body(), usize::MAX)
            .await
            .expect("unable to read response body");

        String::from_utf8(body_bytes.to_vec()).expect("response body is not utf-8")
    }
}

impl From<Response<Body>> for Asserter {
    fn from(response: Response<Body>) -> Self {
        Self { response }
    }
}

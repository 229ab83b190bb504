mod shared;

use shared::TestClient;

#[tokio::test]
async fn requests_without_identity_are_rejected() {
    let mut client = TestClient::default().await;

    client.send(request!(GET "/products")).await.status(401);
    client.send(request!(GET "/subscription")).await.status(401);
    client
        .send(request!(GET "/analytics/views-by-country"))
        .await
        .status(401);
}

#[tokio::test]
async fn provisioning_is_idempotent() {
    let mut client = TestClient::default().await;

    client
        .send(request!(POST "/users"; json { "user_id": "user-1" }))
        .await
        .status(201);

    client
        .send(request!(POST "/users"; json { "user_id": "user-1" }))
        .await
        .status(200);

    client
        .send(request!(POST "/users"; json { "user_id": "" }))
        .await
        .status(422);
}

#[tokio::test]
async fn product_crud_flow() {
    let mut client = TestClient::default().await;

    client
        .send(request!(POST "/users"; json { "user_id": "user-1" }))
        .await
        .status(201);

    let product_id = client
        .send(request!(POST "/products"; "x-user-id" => "user-1"; json {
            "name": "PPP Course",
            "url": "https://course.example.com",
            "description": "video course"
        }))
        .await
        .status(201)
        .into_deserialized_json_body::<serde_json::Value>()
        .await["id"]
        .as_i64()
        .expect("created product has an id");

    client
        .send(request!(GET "/products"; "x-user-id" => "user-1"))
        .await
        .status(200)
        .json_body(|products: serde_json::Value| {
            assert_eq!(products.as_array().map(Vec::len), Some(1));
            assert_eq!(products[0]["name"], "PPP Course");
        })
        .await;

    client
        .send(request!(GET format!("/products/{product_id}"); "x-user-id" => "user-1"))
        .await
        .status(200)
        .json_body(|product: serde_json::Value| {
            assert_eq!(product["url"], "https://course.example.com");
        })
        .await;

    client
        .send(request!(PUT format!("/products/{product_id}"); "x-user-id" => "user-1"; json {
            "name": "PPP Course v2",
            "url": "https://course.example.com",
            "description": null
        }))
        .await
        .status(204);

    // the update must be visible on the very next read
    client
        .send(request!(GET format!("/products/{product_id}"); "x-user-id" => "user-1"))
        .await
        .status(200)
        .json_body(|product: serde_json::Value| {
            assert_eq!(product["name"], "PPP Course v2");
            assert_eq!(product["description"], serde_json::Value::Null);
        })
        .await;

    client
        .send(request!(DELETE format!("/products/{product_id}"); "x-user-id" => "user-1"))
        .await
        .status(204);

    client
        .send(request!(GET format!("/products/{product_id}"); "x-user-id" => "user-1"))
        .await
        .status(404);

    client
        .send(request!(GET "/products"; "x-user-id" => "user-1"))
        .await
        .status(200)
        .json_body(|products: serde_json::Value| {
            assert_eq!(products.as_array().map(Vec::len), Some(0));
        })
        .await;
}

#[tokio::test]
async fn invalid_product_details_are_rejected() {
    let mut client = TestClient::default().await;

    client
        .send(request!(POST "/users"; json { "user_id": "user-1" }))
        .await
        .status(201);

    client
        .send(request!(POST "/products"; "x-user-id" => "user-1"; json {
            "name": "",
            "url": "https://example.com"
        }))
        .await
        .status(422);

    client
        .send(request!(POST "/products"; "x-user-id" => "user-1"; json {
            "name": "No Scheme",
            "url": "example.com"
        }))
        .await
        .status(422);
}

#[tokio::test]
async fn free_tier_allows_a_single_product() {
    let mut client = TestClient::default().await;

    client
        .send(request!(POST "/users"; json { "user_id": "user-1" }))
        .await
        .status(201);

    client
        .send(request!(POST "/products"; "x-user-id" => "user-1"; json {
            "name": "First",
            "url": "https://first.example.com"
        }))
        .await
        .status(201);

    client
        .send(request!(POST "/products"; "x-user-id" => "user-1"; json {
            "name": "Second",
            "url": "https://second.example.com"
        }))
        .await
        .status(403);

    // upgrading the tier lifts the limit immediately
    client
        .send(request!(PUT "/users/user-1/tier"; json { "tier": "basic" }))
        .await
        .status(204);

    client
        .send(request!(POST "/products"; "x-user-id" => "user-1"; json {
            "name": "Second",
            "url": "https://second.example.com"
        }))
        .await
        .status(201);
}

#[tokio::test]
async fn products_are_scoped_to_their_owner() {
    let mut client = TestClient::default().await;

    for user_id in ["user-1", "user-2"] {
        client
            .send(request!(POST "/users"; json { "user_id": user_id }))
            .await
            .status(201);
    }

    let product_id = client
        .send(request!(POST "/products"; "x-user-id" => "user-1"; json {
            "name": "Private",
            "url": "https://private.example.com"
        }))
        .await
        .status(201)
        .into_deserialized_json_body::<serde_json::Value>()
        .await["id"]
        .as_i64()
        .expect("created product has an id");

    client
        .send(request!(GET format!("/products/{product_id}"); "x-user-id" => "user-2"))
        .await
        .status(404);

    client
        .send(request!(PUT format!("/products/{product_id}"); "x-user-id" => "user-2"; json {
            "name": "Hijacked",
            "url": "https://private.example.com"
        }))
        .await
        .status(404);

    client
        .send(request!(GET "/products"; "x-user-id" => "user-2"))
        .await
        .status(200)
        .json_body(|products: serde_json::Value| {
            assert_eq!(products.as_array().map(Vec::len), Some(0));
        })
        .await;
}

#[tokio::test]
async fn subscription_reports_usage() {
    let mut client = TestClient::default().await;

    client
        .send(request!(GET "/subscription"; "x-user-id" => "ghost"))
        .await
        .status(404);

    client
        .send(request!(POST "/users"; json { "user_id": "user-1" }))
        .await
        .status(201);

    client
        .send(request!(GET "/subscription"; "x-user-id" => "user-1"))
        .await
        .status(200)
        .json_body(|status: serde_json::Value| {
            assert_eq!(status["tier"], "free");
            assert_eq!(status["product_count"], 0);
            assert_eq!(status["views_this_month"], 0);
        })
        .await;

    client
        .send(request!(POST "/products"; "x-user-id" => "user-1"; json {
            "name": "Counted",
            "url": "https://counted.example.com"
        }))
        .await
        .status(201);

    client
        .send(request!(GET "/subscription"; "x-user-id" => "user-1"))
        .await
        .status(200)
        .json_body(|status: serde_json::Value| {
            assert_eq!(status["product_count"], 1);
        })
        .await;
}

#[tokio::test]
async fn deleting_a_user_removes_everything_they_own() {
    let mut client = TestClient::default().await;

    client
        .send(request!(POST "/users"; json { "user_id": "user-1" }))
        .await
        .status(201);

    let product_id = client
        .send(request!(POST "/products"; "x-user-id" => "user-1"; json {
            "name": "Doomed",
            "url": "https://doomed.example.com"
        }))
        .await
        .status(201)
        .into_deserialized_json_body::<serde_json::Value>()
        .await["id"]
        .as_i64()
        .expect("created product has an id");

    // prime the per-product caches before the teardown
    client
        .send(request!(GET format!("/products/{product_id}"); "x-user-id" => "user-1"))
        .await
        .status(200);
    client
        .send(request!(GET format!("/products/{product_id}/customization"); "x-user-id" => "user-1"))
        .await
        .status(200);

    client.send(request!(DELETE "/users/user-1")).await.status(204);

    client
        .send(request!(GET "/products"; "x-user-id" => "user-1"))
        .await
        .status(200)
        .json_body(|products: serde_json::Value| {
            assert_eq!(products.as_array().map(Vec::len), Some(0));
        })
        .await;

    // the primed entries must not outlive the teardown
    client
        .send(request!(GET format!("/products/{product_id}"); "x-user-id" => "user-1"))
        .await
        .status(404);
    client
        .send(request!(GET format!("/products/{product_id}/customization"); "x-user-id" => "user-1"))
        .await
        .status(404);

    client
        .send(request!(GET "/subscription"; "x-user-id" => "user-1"))
        .await
        .status(404);

    // idempotent
    client.send(request!(DELETE "/users/user-1")).await.status(204);
}

mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{TestContext, PIXEL_PNG};

#[actix_web::test]
async fn test_create_recipe_returns_full_representation() {
    let ctx = TestContext::new().await;
    let chef = ctx.user("chef").await;
    let dinner = ctx.tag("Dinner").await;
    let pasta = ctx.ingredient("pasta", "g").await;
    let cheese = ctx.ingredient("cheese", "g").await;
    let header = ctx.auth_header(&chef);
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/recipes/")
        .insert_header(header)
        .set_json(json!({
            "ingredients": [{"id": pasta.id, "amount": 200}, {"id": cheese.id, "amount": 50}],
            "tags": [dinner.id],
            "image": PIXEL_PNG,
            "name": "Mac and cheese",
            "text": "Boil, mix, bake.",
            "cooking_time": 25
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Mac and cheese");
    assert_eq!(body["author"]["username"], "chef");
    assert_eq!(body["tags"][0]["slug"], "dinner");
    assert_eq!(body["ingredients"].as_array().unwrap().len(), 2);
    assert_eq!(body["ingredients"][0]["name"], "cheese");
    assert_eq!(body["ingredients"][0]["amount"], 50);
    assert_eq!(body["is_favorited"], false);
    assert!(body["image"].as_str().unwrap().contains("/media/recipes/images/"));
}

#[actix_web::test]
async fn test_create_recipe_requires_tags_and_ingredients() {
    let ctx = TestContext::new().await;
    let chef = ctx.user("chef").await;
    let dinner = ctx.tag("Dinner").await;
    let rice = ctx.ingredient("rice", "g").await;
    let header = ctx.auth_header(&chef);
    let app = test_app!(ctx);

    let invalid = [
        // sans tags
        json!({"ingredients": [{"id": rice.id, "amount": 100}], "tags": [], "image": PIXEL_PNG, "name": "Rice", "text": "Cook", "cooking_time": 20}),
        // doublon de tag
        json!({"ingredients": [{"id": rice.id, "amount": 100}], "tags": [dinner.id, dinner.id], "image": PIXEL_PNG, "name": "Rice", "text": "Cook", "cooking_time": 20}),
        // tag inconnu
        json!({"ingredients": [{"id": rice.id, "amount": 100}], "tags": [9999], "image": PIXEL_PNG, "name": "Rice", "text": "Cook", "cooking_time": 20}),
        // sans ingrédients
        json!({"ingredients": [], "tags": [dinner.id], "image": PIXEL_PNG, "name": "Rice", "text": "Cook", "cooking_time": 20}),
        // doublon d'ingrédient
        json!({"ingredients": [{"id": rice.id, "amount": 100}, {"id": rice.id, "amount": 5}], "tags": [dinner.id], "image": PIXEL_PNG, "name": "Rice", "text": "Cook", "cooking_time": 20}),
        // ingrédient inconnu
        json!({"ingredients": [{"id": 9999, "amount": 100}], "tags": [dinner.id], "image": PIXEL_PNG, "name": "Rice", "text": "Cook", "cooking_time": 20}),
        // quantité nulle
        json!({"ingredients": [{"id": rice.id, "amount": 0}], "tags": [dinner.id], "image": PIXEL_PNG, "name": "Rice", "text": "Cook", "cooking_time": 20}),
        // temps de cuisson nul
        json!({"ingredients": [{"id": rice.id, "amount": 100}], "tags": [dinner.id], "image": PIXEL_PNG, "name": "Rice", "text": "Cook", "cooking_time": 0}),
        // sans image
        json!({"ingredients": [{"id": rice.id, "amount": 100}], "tags": [dinner.id], "name": "Rice", "text": "Cook", "cooking_time": 20}),
    ];

    for payload in invalid {
        let req = test::TestRequest::post()
            .uri("/api/recipes/")
            .insert_header(header.clone())
            .set_json(payload.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);
    }

    let req = test::TestRequest::get().uri("/api/recipes/").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 0);
}

#[actix_web::test]
async fn test_only_author_can_update_or_delete() {
    let ctx = TestContext::new().await;
    let author = ctx.user("author").await;
    let stranger = ctx.user("stranger").await;
    let admin = ctx.admin("boss").await;
    let lunch = ctx.tag("Lunch").await;
    let bread = ctx.ingredient("bread", "g").await;
    let recipe = ctx.recipe(&author, "Sandwich", &[&lunch], &[(&bread, 100)]).await;
    let stranger_header = ctx.auth_header(&stranger);
    let author_header = ctx.auth_header(&author);
    let admin_header = ctx.auth_header(&admin);
    let app = test_app!(ctx);

    let update = json!({
        "ingredients": [{"id": bread.id, "amount": 150}],
        "tags": [lunch.id],
        "name": "Big sandwich",
        "text": "Stack it",
        "cooking_time": 5
    });
    let uri = format!("/api/recipes/{}/", recipe.id);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(stranger_header.clone())
        .set_json(update.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // tags et ingrédients restent obligatoires en modification
    let mut without_tags = update.clone();
    without_tags["tags"] = json!([]);
    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(author_header.clone())
        .set_json(without_tags)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // l'image peut être omise : l'ancienne est conservée
    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(author_header)
        .set_json(update)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Big sandwich");
    assert_eq!(body["ingredients"][0]["amount"], 150);
    assert!(body["image"].is_string());

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(stranger_header)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(admin_header)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_favorite_twice_is_already_added() {
    let ctx = TestContext::new().await;
    let author = ctx.user("author").await;
    let fan = ctx.user("fan").await;
    let dessert = ctx.tag("Dessert").await;
    let sugar = ctx.ingredient("sugar", "g").await;
    let recipe = ctx.recipe(&author, "Fudge", &[&dessert], &[(&sugar, 300)]).await;
    let header = ctx.auth_header(&fan);
    let app = test_app!(ctx);

    let uri = format!("/api/recipes/{}/favorite/", recipe.id);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(header.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], recipe.id);
    assert_eq!(body["name"], "Fudge");
    assert_eq!(body["cooking_time"], 15);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(header.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("already added"));

    // filtre is_favorited
    let req = test::TestRequest::get()
        .uri("/api/recipes/?is_favorited=1")
        .insert_header(header.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["is_favorited"], true);

    let req = test::TestRequest::post()
        .uri("/api/recipes/9999/favorite/")
        .insert_header(header)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_remove_missing_cart_entry_is_400() {
    let ctx = TestContext::new().await;
    let author = ctx.user("author").await;
    let shopper = ctx.user("shopper").await;
    let soup = ctx.tag("Soup").await;
    let water = ctx.ingredient("water", "ml").await;
    let recipe = ctx.recipe(&author, "Broth", &[&soup], &[(&water, 500)]).await;
    let header = ctx.auth_header(&shopper);
    let app = test_app!(ctx);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/recipes/{}/shopping_cart/", recipe.id))
        .insert_header(header.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri("/api/recipes/9999/shopping_cart/")
        .insert_header(header)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_shopping_list_sums_shared_ingredients() {
    let ctx = TestContext::new().await;
    let author = ctx.user("author").await;
    let shopper = ctx.user("shopper").await;
    let baking = ctx.tag("Baking").await;
    let flour = ctx.ingredient("flour", "g").await;
    let milk = ctx.ingredient("milk", "ml").await;
    let bread = ctx.recipe(&author, "Bread", &[&baking], &[(&flour, 500)]).await;
    let pancakes = ctx
        .recipe(&author, "Pancakes", &[&baking], &[(&flour, 200), (&milk, 250)])
        .await;
    ctx.recipe(&author, "Not in cart", &[&baking], &[(&flour, 1000)]).await;
    let header = ctx.auth_header(&shopper);
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/recipes/download_shopping_cart/")
        .insert_header(header.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    for recipe in [&pancakes, &bread] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/recipes/{}/shopping_cart/", recipe.id))
            .insert_header(header.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/recipes/download_shopping_cart/")
        .insert_header(header)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("attachment"));

    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Shopping list for: \"Shopper Tester\"");
    assert!(lines[1].starts_with("Date: "));
    assert_eq!(
        lines[2..].to_vec(),
        vec![
            "Ingredients:",
            "1. Flour (g) - 700",
            "2. Milk (ml) - 250",
            "Recipes:",
            "1. Bread",
            "2. Pancakes",
        ]
    );
}

#[actix_web::test]
async fn test_recipe_filters() {
    let ctx = TestContext::new().await;
    let anna = ctx.user("anna").await;
    let boris = ctx.user("boris").await;
    let breakfast = ctx.tag("Breakfast").await;
    let dinner = ctx.tag("Dinner").await;
    let lunch = ctx.tag("Lunch").await;
    let eggs = ctx.ingredient("eggs", "pcs").await;
    ctx.recipe(&anna, "Omelette", &[&breakfast], &[(&eggs, 2)]).await;
    ctx.recipe(&anna, "Frittata", &[&dinner], &[(&eggs, 4)]).await;
    ctx.recipe(&boris, "Egg salad", &[&lunch], &[(&eggs, 3)]).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri(&format!("/api/recipes/?author={}", anna.id))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 2);

    let req = test::TestRequest::get()
        .uri("/api/recipes/?tags=breakfast&tags=lunch")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 2);

    // ignoré pour un visiteur anonyme
    let req = test::TestRequest::get()
        .uri("/api/recipes/?is_in_shopping_cart=1")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 3);

    let req = test::TestRequest::get()
        .uri("/api/recipes/?author=abc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // slug inconnu : erreur plutôt qu'une liste vide
    let req = test::TestRequest::get()
        .uri("/api/recipes/?tags=breakfast&tags=brunch")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("brunch"));
}

#[actix_web::test]
async fn test_short_link() {
    let ctx = TestContext::new().await;
    let author = ctx.user("author").await;
    let snack = ctx.tag("Snack").await;
    let nuts = ctx.ingredient("nuts", "g").await;
    let recipe = ctx.recipe(&author, "Trail mix", &[&snack], &[(&nuts, 100)]).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri(&format!("/api/recipes/{}/get-link/", recipe.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["short-link"]
        .as_str()
        .unwrap()
        .ends_with(&format!("/s/{}/", recipe.id)));

    let req = test::TestRequest::get()
        .uri(&format!("/s/{}/", recipe.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
        format!("/recipes/{}/", recipe.id)
    );

    let req = test::TestRequest::get().uri("/s/9999/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/recipes/9999/get-link/")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

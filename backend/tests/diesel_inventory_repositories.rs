//! Integration tests for the Diesel adapters against a real PostgreSQL.
//!
//! Set `INVENTORY_TEST_DATABASE_URL` to a disposable database to run them.
//! Migrations are applied on first use. Every test creates its own users and
//! products with unique names and ids, so the suite may share a database with
//! other runs. Without the variable each test prints a skip marker and passes.

use chrono::{Duration, Utc};
use inventory::domain::ports::{
    DocumentRepository, LlmCacheRepository, NewUserRecord, ProductRepository,
    ProductRepositoryError, UserPersistenceError, UserRepository, VectorStore,
};
use inventory::domain::{
    CacheKey, CachedAnswer, Collection, DocumentUpload, NewDocument, NewEmbedding, NewProduct,
    Product, ProductDraft, ProductId, Role, SearchScope, User, Username,
};
use inventory::outbound::persistence::{
    DbPool, DieselDocumentRepository, DieselLlmCacheRepository, DieselProductRepository,
    DieselUserRepository, DieselVectorStore, PoolConfig, run_pending_migrations,
};
use rstest::rstest;
use serde_json::json;
use tokio::sync::OnceCell;
use uuid::Uuid;

const DATABASE_URL_ENV: &str = "INVENTORY_TEST_DATABASE_URL";

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connect to the test database, or `None` when it is not configured.
async fn test_pool() -> Option<DbPool> {
    let Ok(database_url) = std::env::var(DATABASE_URL_ENV) else {
        eprintln!("SKIP-TEST-CLUSTER: {DATABASE_URL_ENV} is not set");
        return None;
    };
    MIGRATED
        .get_or_init(|| async {
            let url = database_url.clone();
            tokio::task::spawn_blocking(move || run_pending_migrations(&url))
                .await
                .expect("migration task panicked")
                .expect("migrations apply");
        })
        .await;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(2))
        .await
        .expect("pool builds");
    Some(pool)
}

fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()
}

fn unique_product_id() -> ProductId {
    let raw = Uuid::new_v4().as_u128() % 1_000_000_000;
    ProductId::new(i32::try_from(raw).expect("fits in i32") + 1).expect("positive id")
}

async fn create_user(pool: &DbPool, role: Role) -> User {
    let repo = DieselUserRepository::new(pool.clone());
    let record = NewUserRecord {
        username: Username::new(&format!("user-{}", unique_suffix())).expect("valid username"),
        password_hash: "$argon2id$v=19$fixture".to_owned(),
        role,
    };
    repo.create(&record).await.expect("user inserts")
}

fn book(id: ProductId, quantity: i32) -> Product {
    let draft = ProductDraft {
        product_id: Some(id.get()),
        product_name: Some("Integration Book".to_owned()),
        quantity: Some(quantity),
        price: Some(12.5),
        kind: Some("book".to_owned()),
        author: Some("A. Writer".to_owned()),
        pages: Some(220),
        ..ProductDraft::default()
    };
    Product::from_new(NewProduct::try_from(draft).expect("valid book"), None)
}

fn seeded_vector(seed: u128) -> Vec<f32> {
    (0..7)
        .map(|i| f32::from(u8::try_from((seed >> (i * 8)) & 0x7f).expect("masked byte")) + 1.0)
        .collect()
}

#[rstest]
#[tokio::test]
async fn users_round_trip_and_reject_duplicate_names() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repo = DieselUserRepository::new(pool.clone());
    let record = NewUserRecord {
        username: Username::new(&format!("manager-{}", unique_suffix())).expect("valid username"),
        password_hash: "$argon2id$v=19$hash".to_owned(),
        role: Role::Manager,
    };

    let created = repo.create(&record).await.expect("user inserts");
    assert_eq!(created.role, Role::Manager);
    assert_eq!(created.username, record.username);

    let credentials = repo
        .find_credentials(record.username.as_str())
        .await
        .expect("lookup succeeds")
        .expect("user exists");
    assert_eq!(credentials.user, created);
    assert_eq!(credentials.password_hash, record.password_hash);

    let by_id = repo.find_by_id(created.id).await.expect("lookup succeeds");
    assert_eq!(by_id, Some(created));

    let duplicate = repo.create(&record).await;
    assert!(matches!(
        duplicate,
        Err(UserPersistenceError::DuplicateUsername { .. })
    ));
}

#[rstest]
#[tokio::test]
async fn unknown_usernames_have_no_credentials() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repo = DieselUserRepository::new(pool);
    let found = repo
        .find_credentials(&format!("ghost-{}", unique_suffix()))
        .await
        .expect("lookup succeeds");
    assert!(found.is_none());
}

#[rstest]
#[tokio::test]
async fn products_support_the_full_lifecycle() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repo = DieselProductRepository::new(pool);
    let id = unique_product_id();
    let product = book(id, 3);

    repo.insert(&product).await.expect("product inserts");
    assert_eq!(
        repo.find_by_id(id).await.expect("lookup succeeds"),
        Some(product.clone())
    );
    assert!(matches!(
        repo.insert(&product).await,
        Err(ProductRepositoryError::DuplicateId { .. })
    ));

    let low = repo.list_below_quantity(5).await.expect("report query");
    assert!(low.iter().any(|p| p.id == id));

    let mut restocked = product.clone();
    restocked.quantity = 40;
    assert!(repo.update(&restocked).await.expect("update succeeds"));
    let low = repo.list_below_quantity(5).await.expect("report query");
    assert!(low.iter().all(|p| p.id != id));

    assert!(repo.delete(id).await.expect("delete succeeds"));
    assert!(!repo.delete(id).await.expect("delete succeeds"));
    assert_eq!(repo.find_by_id(id).await.expect("lookup succeeds"), None);
}

#[rstest]
#[tokio::test]
async fn updating_a_missing_product_reports_no_change() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repo = DieselProductRepository::new(pool);
    let updated = repo
        .update(&book(unique_product_id(), 1))
        .await
        .expect("update runs");
    assert!(!updated);
}

#[rstest]
#[tokio::test]
async fn document_chunks_are_only_visible_to_their_owner() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let owner = create_user(&pool, Role::Staff).await;
    let other = create_user(&pool, Role::Staff).await;
    let documents = DieselDocumentRepository::new(pool.clone());
    let vectors = DieselVectorStore::new(pool);

    let upload = DocumentUpload::try_from_parts(
        "notes.txt",
        None,
        "Aisle 4 holds the winter stock.".to_owned(),
    )
    .expect("valid upload");
    let document_id = documents
        .insert(&NewDocument {
            user_id: owner.id,
            upload,
        })
        .await
        .expect("document inserts");

    let marker = format!("private chunk {}", unique_suffix());
    let vector = seeded_vector(Uuid::new_v4().as_u128());
    let stored = vectors
        .add(vec![NewEmbedding {
            collection: Collection::UserEmbeddings,
            content: marker.clone(),
            embedding: vector.clone(),
            metadata: json!({ "filename": "notes.txt" }),
            user_id: Some(owner.id),
            product_id: None,
            document_id: Some(document_id),
        }])
        .await
        .expect("chunk stores");
    assert_eq!(stored, 1);

    let for_owner = vectors
        .similarity_search(&vector, SearchScope {
                user_id: Some(owner.id),
            }, 1)
        .await
        .expect("search succeeds");
    assert_eq!(for_owner.first().map(|c| c.content.as_str()), Some(marker.as_str()));

    let for_other = vectors
        .similarity_search(&vector, SearchScope {
                user_id: Some(other.id),
            }, 50)
        .await
        .expect("search succeeds");
    assert!(for_other.iter().all(|c| c.content != marker));
}

#[rstest]
#[tokio::test]
async fn embedded_products_are_listed_once() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let products = DieselProductRepository::new(pool.clone());
    let vectors = DieselVectorStore::new(pool);
    let id = unique_product_id();
    products.insert(&book(id, 9)).await.expect("product inserts");

    let chunk = |content: &str| NewEmbedding {
        collection: Collection::ProductEmbeddings,
        content: content.to_owned(),
        embedding: vec![0.1, 0.2, 0.3],
        metadata: json!({ "product_id": id.get() }),
        user_id: None,
        product_id: Some(id),
        document_id: None,
    };
    vectors
        .add(vec![chunk("first half"), chunk("second half")])
        .await
        .expect("chunks store");

    let embedded = vectors.embedded_product_ids().await.expect("query succeeds");
    assert_eq!(embedded.iter().filter(|p| **p == id).count(), 1);

    products.delete(id).await.expect("cleanup");
}

#[rstest]
#[tokio::test]
async fn cached_answers_are_replaced_and_invalidated_per_user() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user = create_user(&pool, Role::Admin).await;
    let cache = DieselLlmCacheRepository::new(pool);
    let key = CacheKey::new("gpt-4o-mini", "How many books are left?", user.id);
    let now = Utc::now();

    assert_eq!(cache.get(&key).await.expect("lookup succeeds"), None);

    let first = CachedAnswer::fresh("Twelve.".to_owned(), now, Duration::minutes(10));
    cache.upsert(&key, &first).await.expect("first upsert");
    let second = CachedAnswer::fresh("Eleven.".to_owned(), now, Duration::minutes(20));
    cache.upsert(&key, &second).await.expect("second upsert");

    let cached = cache.get(&key).await.expect("lookup succeeds").expect("entry");
    assert_eq!(cached.response, "Eleven.");
    assert!(!cached.is_expired(now + Duration::minutes(15)));

    assert_eq!(cache.invalidate_user(user.id).await.expect("invalidate"), 1);
    assert_eq!(cache.get(&key).await.expect("lookup succeeds"), None);
}

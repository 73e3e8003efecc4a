//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts with their password hash and role.
    users (id) {
        id -> Int4,
        username -> Varchar,
        password_hash -> Varchar,
        /// One of `admin`, `manager`, `staff`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Inventory items. Category-specific columns are null when unused.
    products (product_id) {
        product_id -> Int4,
        product_name -> Varchar,
        quantity -> Int4,
        price -> Float8,
        /// Empty string for generic products.
        #[sql_name = "type"]
        kind -> Varchar,
        expiry_date -> Nullable<Date>,
        warranty_period -> Nullable<Int4>,
        author -> Nullable<Varchar>,
        pages -> Nullable<Int4>,
        created_by -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Raw text uploads.
    documents (id) {
        id -> Int4,
        user_id -> Int4,
        filename -> Varchar,
        content_type -> Nullable<Varchar>,
        text -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Embedded text chunks partitioned by collection.
    embeddings (id) {
        id -> Int8,
        collection -> Varchar,
        content -> Text,
        embedding -> Array<Float4>,
        metadata -> Jsonb,
        user_id -> Nullable<Int4>,
        product_id -> Nullable<Int4>,
        document_id -> Nullable<Int4>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Chatbot answers keyed by model, prompt hash, and user.
    llm_cache (id) {
        id -> Int4,
        model_name -> Varchar,
        prompt -> Text,
        prompt_hash -> Varchar,
        response -> Text,
        user_id -> Int4,
        created_at -> Timestamptz,
        expiration_time -> Timestamptz,
    }
}

diesel::joinable!(documents -> users (user_id));
diesel::joinable!(llm_cache -> users (user_id));
diesel::joinable!(products -> users (created_by));

diesel::allow_tables_to_appear_in_same_query!(documents, embeddings, llm_cache, products, users);

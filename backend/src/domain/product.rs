//! Product records and their creation and update inputs.
//!
//! Products are flat rows with optional category fields. The category
//! ([`ProductKind`]) decides which of those fields are required on creation
//! and which are rejected as unexpected.

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use super::UserId;

/// Validation failure for product input, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProductValidationError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ProductValidationError {
    fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_owned(),
            code: code.to_owned(),
            message: message.into(),
        }
    }

    fn missing(field: &str) -> Self {
        Self::new(field, "missing_field", format!("missing required field: {field}"))
    }

    fn unexpected(field: &str, kind: ProductKind) -> Self {
        Self::new(
            field,
            "unexpected_field",
            format!("{field} is not permitted for {} products", kind.label()),
        )
    }

    /// Collapse `validator` output into the first failing field, ordered by
    /// field name so responses are deterministic.
    fn from_validation_errors(errors: &ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|(left, _), (right, _)| left.cmp(right));
        fields
            .into_iter()
            .find_map(|(field, failures)| {
                failures.first().map(|failure| {
                    let message = failure
                        .message
                        .as_ref()
                        .map_or_else(|| format!("{field} is invalid"), Cow::to_string);
                    Self::new(&field, &failure.code, message)
                })
            })
            .unwrap_or_else(|| Self::new("body", "invalid", "product payload is invalid"))
    }
}

/// Externally assigned positive product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct ProductId(i32);

impl ProductId {
    pub fn new(raw: i32) -> Result<Self, ProductValidationError> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(ProductValidationError::new(
                "product_id",
                "range",
                "product_id must be greater than 0",
            ))
        }
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for ProductId {
    type Error = ProductValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for i32 {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProductKind {
    Food,
    Electronic,
    Book,
    #[default]
    Generic,
}

impl ProductKind {
    /// Parse a stored or submitted category. Unknown and blank values map to
    /// [`ProductKind::Generic`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "food" => Self::Food,
            "electronic" => Self::Electronic,
            "book" => Self::Book,
            _ => Self::Generic,
        }
    }

    /// Stored and serialised value. Generic products store an empty string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Electronic => "electronic",
            Self::Book => "book",
            Self::Generic => "",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            other => other.as_str(),
        }
    }
}

impl Serialize for ProductKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProductKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Stored inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Product {
    #[serde(rename = "product_id")]
    #[schema(value_type = i32, example = 101)]
    pub id: ProductId,
    #[serde(rename = "product_name")]
    #[schema(example = "Organic milk")]
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "food")]
    pub kind: ProductKind,
    pub expiry_date: Option<NaiveDate>,
    pub warranty_period: Option<i32>,
    pub author: Option<String>,
    pub pages: Option<i32>,
    #[schema(value_type = Option<i32>)]
    pub created_by: Option<UserId>,
}

impl Product {
    /// Materialise a validated creation request.
    #[must_use]
    pub fn from_new(new: NewProduct, created_by: Option<UserId>) -> Self {
        let NewProduct {
            id,
            name,
            quantity,
            price,
            kind,
            expiry_date,
            warranty_period,
            author,
            pages,
        } = new;
        Self {
            id,
            name,
            quantity,
            price,
            kind,
            expiry_date,
            warranty_period,
            author,
            pages,
            created_by,
        }
    }

    /// Merge a validated patch; absent fields keep their current values.
    pub fn apply(&mut self, patch: ProductPatch) {
        let ProductPatch {
            product_name,
            quantity,
            price,
            kind,
            expiry_date,
            warranty_period,
            author,
            pages,
        } = patch;
        if let Some(name) = product_name {
            self.name = name.trim().to_owned();
        }
        if let Some(quantity) = quantity {
            self.quantity = quantity;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(kind) = kind {
            self.kind = ProductKind::parse(&kind);
        }
        if expiry_date.is_some() {
            self.expiry_date = expiry_date;
        }
        if warranty_period.is_some() {
            self.warranty_period = warranty_period;
        }
        if author.is_some() {
            self.author = author;
        }
        if pages.is_some() {
            self.pages = pages;
        }
    }

    /// Stock value used by reports.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Text rendered into the vector store for this product: the name on the
    /// first line, then the populated attributes joined by ` | `.
    ///
    /// # Examples
    /// ```
    /// use inventory::domain::{NewProduct, Product, ProductDraft};
    ///
    /// let draft = ProductDraft {
    ///     product_id: Some(1),
    ///     product_name: Some("Lamp".into()),
    ///     quantity: Some(3),
    ///     price: Some(12.5),
    ///     ..ProductDraft::default()
    /// };
    /// let product = Product::from_new(NewProduct::try_from(draft).unwrap(), None);
    /// assert_eq!(product.describe(), "Lamp\nPrice: 12.5 | Quantity: 3");
    /// ```
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.kind != ProductKind::Generic {
            parts.push(format!("Type: {}", self.kind.as_str()));
        }
        parts.push(format!("Price: {}", self.price));
        if self.quantity != 0 {
            parts.push(format!("Quantity: {}", self.quantity));
        }
        if let Some(date) = self.expiry_date {
            parts.push(format!("Expiry Date: {date}"));
        }
        if let Some(months) = self.warranty_period.filter(|months| *months != 0) {
            parts.push(format!("Warranty Period: {months}"));
        }
        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            parts.push(format!("Author: {author}"));
        }
        if let Some(pages) = self.pages {
            parts.push(format!("Pages: {pages}"));
        }
        if let Some(owner) = self.created_by {
            parts.push(format!("Created By: {owner}"));
        }
        format!("{}\n{}", self.name, parts.join(" | "))
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("product_name must not be empty"));
        return Err(error);
    }
    Ok(())
}

/// Raw product creation payload. `type` (or its alias `category`) selects
/// the validation rules applied by [`NewProduct::try_from`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ProductDraft {
    #[validate(range(min = 1, message = "product_id must be greater than 0"))]
    #[schema(example = 101)]
    pub product_id: Option<i32>,
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 255, message = "product_name must be at most 255 characters")
    )]
    #[schema(example = "Organic milk", max_length = 255)]
    pub product_name: Option<String>,
    #[validate(range(min = 0, message = "quantity must be zero or more"))]
    pub quantity: Option<i32>,
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than 0"))]
    pub price: Option<f64>,
    #[serde(rename = "type", alias = "category", default)]
    #[schema(example = "food")]
    pub kind: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2026-01-31")]
    pub expiry_date: Option<NaiveDate>,
    #[validate(range(min = 1, message = "warranty_period must be greater than 0"))]
    pub warranty_period: Option<i32>,
    #[validate(length(max = 255, message = "author must be at most 255 characters"))]
    #[schema(max_length = 255)]
    pub author: Option<String>,
    #[validate(range(min = 1, message = "pages must be at least 1"))]
    pub pages: Option<i32>,
}

/// Validated product creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub id: ProductId,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub kind: ProductKind,
    pub expiry_date: Option<NaiveDate>,
    pub warranty_period: Option<i32>,
    pub author: Option<String>,
    pub pages: Option<i32>,
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, ProductValidationError> {
    value.ok_or_else(|| ProductValidationError::missing(field))
}

fn forbid<T>(value: Option<&T>, field: &str, kind: ProductKind) -> Result<(), ProductValidationError> {
    match value {
        Some(_) => Err(ProductValidationError::unexpected(field, kind)),
        None => Ok(()),
    }
}

impl TryFrom<ProductDraft> for NewProduct {
    type Error = ProductValidationError;

    fn try_from(draft: ProductDraft) -> Result<Self, Self::Error> {
        draft
            .validate()
            .map_err(|errors| ProductValidationError::from_validation_errors(&errors))?;

        let ProductDraft {
            product_id,
            product_name,
            quantity,
            price,
            kind,
            expiry_date,
            warranty_period,
            author,
            pages,
        } = draft;

        let id = ProductId::new(require(product_id, "product_id")?)?;
        let name = require(product_name, "product_name")?.trim().to_owned();
        let quantity = require(quantity, "quantity")?;
        let price = require(price, "price")?;
        let kind = kind.as_deref().map(ProductKind::parse).unwrap_or_default();

        let author = author.map(|a| a.trim().to_owned());
        match kind {
            ProductKind::Food => {
                require(expiry_date, "expiry_date")?;
                forbid(warranty_period.as_ref(), "warranty_period", kind)?;
                forbid(author.as_ref(), "author", kind)?;
                forbid(pages.as_ref(), "pages", kind)?;
            }
            ProductKind::Electronic => {
                require(warranty_period, "warranty_period")?;
                forbid(expiry_date.as_ref(), "expiry_date", kind)?;
                forbid(author.as_ref(), "author", kind)?;
                forbid(pages.as_ref(), "pages", kind)?;
            }
            ProductKind::Book => {
                let name = require(author.as_ref(), "author")?;
                if name.is_empty() {
                    return Err(ProductValidationError::new(
                        "author",
                        "blank",
                        "author must not be empty",
                    ));
                }
                require(pages, "pages")?;
                forbid(expiry_date.as_ref(), "expiry_date", kind)?;
                forbid(warranty_period.as_ref(), "warranty_period", kind)?;
            }
            ProductKind::Generic => {
                forbid(expiry_date.as_ref(), "expiry_date", kind)?;
                forbid(warranty_period.as_ref(), "warranty_period", kind)?;
                forbid(author.as_ref(), "author", kind)?;
                forbid(pages.as_ref(), "pages", kind)?;
            }
        }

        Ok(Self {
            id,
            name,
            quantity,
            price,
            kind,
            expiry_date,
            warranty_period,
            author,
            pages,
        })
    }
}

/// Partial product update. Every field is optional; an empty patch is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ProductPatch {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 255, message = "product_name must be at most 255 characters")
    )]
    #[schema(max_length = 255)]
    pub product_name: Option<String>,
    #[validate(range(min = 0, message = "quantity must be zero or more"))]
    pub quantity: Option<i32>,
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than 0"))]
    pub price: Option<f64>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub expiry_date: Option<NaiveDate>,
    #[validate(range(min = 0, message = "warranty_period must be zero or more"))]
    pub warranty_period: Option<i32>,
    #[validate(length(max = 255, message = "author must be at most 255 characters"))]
    #[schema(max_length = 255)]
    pub author: Option<String>,
    #[validate(range(min = 1, message = "pages must be at least 1"))]
    pub pages: Option<i32>,
}

impl ProductPatch {
    /// Run field validation, returning the patch unchanged when it passes.
    pub fn validated(self) -> Result<Self, ProductValidationError> {
        self.validate()
            .map_err(|errors| ProductValidationError::from_validation_errors(&errors))?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for product validation and rendering.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn base_draft() -> ProductDraft {
        ProductDraft {
            product_id: Some(1),
            product_name: Some("Widget".to_owned()),
            quantity: Some(10),
            price: Some(2.5),
            ..ProductDraft::default()
        }
    }

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
    }

    #[rstest]
    #[case("food", ProductKind::Food)]
    #[case(" Electronic", ProductKind::Electronic)]
    #[case("BOOK", ProductKind::Book)]
    #[case("", ProductKind::Generic)]
    #[case("furniture", ProductKind::Generic)]
    fn kind_parses_leniently(#[case] raw: &str, #[case] expected: ProductKind) {
        assert_eq!(ProductKind::parse(raw), expected);
    }

    #[rstest]
    fn generic_draft_builds_product(base_draft: ProductDraft) {
        let product = NewProduct::try_from(base_draft).expect("valid generic product");
        assert_eq!(product.id.get(), 1);
        assert_eq!(product.kind, ProductKind::Generic);
    }

    #[rstest]
    #[case(Some(0), None, None, "product_id", "range")]
    #[case(None, Some(-1), None, "quantity", "range")]
    #[case(None, None, Some(0.0), "price", "range")]
    fn base_ranges_are_enforced(
        base_draft: ProductDraft,
        #[case] product_id: Option<i32>,
        #[case] quantity: Option<i32>,
        #[case] price: Option<f64>,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let draft = ProductDraft {
            product_id: product_id.or(base_draft.product_id),
            quantity: quantity.or(base_draft.quantity),
            price: price.or(base_draft.price),
            ..base_draft
        };
        let err = NewProduct::try_from(draft).expect_err("out-of-range value must fail");
        assert_eq!(err.field, field);
        assert_eq!(err.code, code);
    }

    #[rstest]
    fn blank_name_is_rejected(base_draft: ProductDraft) {
        let draft = ProductDraft {
            product_name: Some("   ".to_owned()),
            ..base_draft
        };
        let err = NewProduct::try_from(draft).expect_err("blank name must fail");
        assert_eq!(err.field, "product_name");
        assert_eq!(err.message, "product_name must not be empty");
    }

    #[rstest]
    #[case("product_name", None)]
    #[case("author", Some("book"))]
    fn draft_rejects_overlong_text(
        base_draft: ProductDraft,
        #[case] field: &str,
        #[case] kind: Option<&str>,
    ) {
        let long = "x".repeat(300);
        let draft = if field == "author" {
            ProductDraft {
                kind: kind.map(str::to_owned),
                author: Some(long),
                pages: Some(10),
                ..base_draft
            }
        } else {
            ProductDraft {
                product_name: Some(long),
                ..base_draft
            }
        };
        let err = NewProduct::try_from(draft).expect_err("overlong text must fail");
        assert_eq!(err.field, field);
        assert_eq!(err.code, "length");
    }

    #[rstest]
    fn names_at_the_limit_are_accepted(base_draft: ProductDraft) {
        let draft = ProductDraft {
            product_name: Some("n".repeat(255)),
            ..base_draft
        };
        let product = NewProduct::try_from(draft).expect("255 characters fit");
        assert_eq!(product.name.chars().count(), 255);
    }

    #[rstest]
    #[case("food", "expiry_date")]
    #[case("electronic", "warranty_period")]
    #[case("book", "author")]
    fn kind_specific_fields_are_required(
        base_draft: ProductDraft,
        #[case] kind: &str,
        #[case] field: &str,
    ) {
        let draft = ProductDraft {
            kind: Some(kind.to_owned()),
            ..base_draft
        };
        let err = NewProduct::try_from(draft).expect_err("missing field must fail");
        assert_eq!(err.field, field);
        assert_eq!(err.code, "missing_field");
    }

    #[rstest]
    fn food_rejects_book_fields(base_draft: ProductDraft) {
        let draft = ProductDraft {
            kind: Some("food".to_owned()),
            expiry_date: Some(date("2026-01-31")),
            author: Some("Someone".to_owned()),
            ..base_draft
        };
        let err = NewProduct::try_from(draft).expect_err("unexpected field must fail");
        assert_eq!(err.field, "author");
        assert_eq!(err.code, "unexpected_field");
    }

    #[rstest]
    fn book_requires_positive_pages(base_draft: ProductDraft) {
        let draft = ProductDraft {
            kind: Some("book".to_owned()),
            author: Some("Le Guin".to_owned()),
            pages: Some(0),
            ..base_draft
        };
        let err = NewProduct::try_from(draft).expect_err("zero pages must fail");
        assert_eq!(err.field, "pages");
    }

    #[rstest]
    fn draft_rejects_unknown_json_fields() {
        let result: Result<ProductDraft, _> = serde_json::from_value(serde_json::json!({
            "product_id": 1,
            "product_name": "Widget",
            "quantity": 1,
            "price": 1.0,
            "colour": "red",
        }));
        assert!(result.is_err());
    }

    #[rstest]
    fn draft_accepts_category_alias() {
        let draft: ProductDraft = serde_json::from_value(serde_json::json!({
            "product_id": 2,
            "product_name": "Laptop",
            "quantity": 1,
            "price": 999.0,
            "category": "electronic",
            "warranty_period": 24,
        }))
        .expect("category alias accepted");
        let product = NewProduct::try_from(draft).expect("valid electronic product");
        assert_eq!(product.kind, ProductKind::Electronic);
        assert_eq!(product.warranty_period, Some(24));
    }

    #[rstest]
    fn patch_merges_present_fields(base_draft: ProductDraft) {
        let mut product = Product::from_new(
            NewProduct::try_from(base_draft).expect("valid product"),
            None,
        );
        let patch = ProductPatch {
            quantity: Some(0),
            price: Some(3.0),
            ..ProductPatch::default()
        }
        .validated()
        .expect("valid patch");
        product.apply(patch);
        assert_eq!(product.quantity, 0);
        assert!((product.price - 3.0).abs() < f64::EPSILON);
        assert_eq!(product.name, "Widget");
    }

    #[rstest]
    #[case(ProductPatch { quantity: Some(-1), ..ProductPatch::default() }, "quantity")]
    #[case(ProductPatch { price: Some(-2.0), ..ProductPatch::default() }, "price")]
    #[case(ProductPatch { pages: Some(0), ..ProductPatch::default() }, "pages")]
    #[case(ProductPatch { warranty_period: Some(-1), ..ProductPatch::default() }, "warranty_period")]
    fn patch_validation_rejects_out_of_range(#[case] patch: ProductPatch, #[case] field: &str) {
        let err = patch.validated().expect_err("invalid patch must fail");
        assert_eq!(err.field, field);
    }

    #[rstest]
    #[case(ProductPatch { product_name: Some("y".repeat(300)), ..ProductPatch::default() }, "product_name")]
    #[case(ProductPatch { author: Some("y".repeat(300)), ..ProductPatch::default() }, "author")]
    fn patch_validation_rejects_overlong_text(#[case] patch: ProductPatch, #[case] field: &str) {
        let err = patch.validated().expect_err("overlong patch must fail");
        assert_eq!(err.field, field);
        assert_eq!(err.code, "length");
    }

    #[rstest]
    fn describe_renders_populated_fields() {
        let product = Product {
            id: ProductId::new(5).expect("valid id"),
            name: "Dune".to_owned(),
            quantity: 4,
            price: 9.5,
            kind: ProductKind::Book,
            expiry_date: None,
            warranty_period: None,
            author: Some("Frank Herbert".to_owned()),
            pages: Some(412),
            created_by: Some(UserId::new(2).expect("valid user id")),
        };
        assert_eq!(
            product.describe(),
            "Dune\nType: book | Price: 9.5 | Quantity: 4 | Author: Frank Herbert | Pages: 412 | Created By: 2"
        );
        assert!((product.total_value() - 38.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn product_serialises_with_api_field_names(base_draft: ProductDraft) {
        let product = Product::from_new(NewProduct::try_from(base_draft).expect("valid"), None);
        let value = serde_json::to_value(&product).expect("serialise product");
        assert_eq!(value["product_id"], 1);
        assert_eq!(value["product_name"], "Widget");
        assert_eq!(value["type"], "");
        assert!(value["created_by"].is_null());
    }
}

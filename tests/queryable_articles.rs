//! Article Query Tests
//!
//! End-to-end tests of the lazy query surface over an in-memory store:
//! - Filters compose into a single conjunction
//! - Membership and quantifier forms select the same documents
//! - Nested collection predicates reach into embedded arrays
//! - Materialization is repeatable and never cached
//! - Rejected predicates fail before any document is read

use aerolite::collection::{Collection, Entity, QueryError, QueryProvider};
use aerolite::expression::{Expr, ExprType, Lambda, Parameter};
use aerolite::mapper::{BsonMapper, EntityMapping, MemberMapper};
use aerolite::query::Query;
use aerolite::translator::TranslateError;
use serde::{Deserialize, Serialize};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Allergeen {
    #[serde(rename = "Code")]
    code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Article {
    #[serde(rename = "_id")]
    article_number: i64,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Allergeens")]
    allergeens: Vec<Allergeen>,
}

impl Entity for Article {
    fn type_name() -> &'static str {
        "Article"
    }
}

fn article(article_number: i64, category: &str, codes: &[&str]) -> Article {
    Article {
        article_number,
        category: category.to_string(),
        allergeens: codes
            .iter()
            .map(|code| Allergeen { code: code.to_string() })
            .collect(),
    }
}

fn mapper() -> BsonMapper {
    BsonMapper::new()
        .with_entity(
            EntityMapping::new("Article")
                .member(MemberMapper::id("ArticleNumber", "int"))
                .member(MemberMapper::same_name("Category", "string"))
                .member(MemberMapper::same_name("Allergeens", "Allergeen")),
        )
        .with_entity(EntityMapping::new("Allergeen").member(MemberMapper::same_name("Code", "string")))
}

fn setup_articles() -> Collection<Article> {
    let articles = Collection::new(mapper());
    articles
        .insert_many(&[
            article(1, "Test", &["A", "B"]),
            article(2, "Demo", &["C"]),
            article(3, "Test", &[]),
            article(4, "AllergeneFree", &["A"]),
        ])
        .unwrap();
    articles
}

fn a() -> Parameter {
    Parameter::new("a", ExprType::Entity("Article".into()))
}

fn number(a: &Parameter) -> Expr {
    a.member("ArticleNumber", ExprType::Int)
}

fn category(a: &Parameter) -> Expr {
    a.member("Category", ExprType::String)
}

fn allergeens(a: &Parameter) -> Expr {
    a.member(
        "Allergeens",
        ExprType::collection_of(ExprType::Entity("Allergeen".into())),
    )
}

fn category_contains(needle: &str) -> Lambda {
    let a = a();
    Lambda::new([a.clone()], Expr::string_contains(category(&a), Expr::string(needle)))
}

fn numbers(found: Vec<Article>) -> Vec<i64> {
    found.into_iter().map(|a| a.article_number).collect()
}

fn int_list(ids: &[i64]) -> Expr {
    Expr::local(
        "ids",
        ExprType::collection_of(ExprType::Int),
        json!(ids),
    )
}

// =============================================================================
// Filter Composition Tests
// =============================================================================

/// Two chained substring filters keep only the "Test" articles.
#[test]
fn test_chained_contains_filters() {
    let articles = setup_articles();

    let found = articles
        .as_queryable()
        .filter(category_contains("e"))
        .filter(category_contains("s"))
        .to_list()
        .unwrap();

    assert_eq!(numbers(found), vec![1, 3]);
}

/// Chaining and a single conjunction return the same documents.
#[test]
fn test_chaining_equivalence() {
    let articles = setup_articles();
    let a = a();

    let chained = articles
        .as_queryable()
        .filter(category_contains("e"))
        .filter(category_contains("s"));

    let conjunction = articles.as_queryable().filter(Lambda::new(
        [a.clone()],
        Expr::and_also(
            Expr::string_contains(category(&a), Expr::string("e")),
            Expr::string_contains(category(&a), Expr::string("s")),
        ),
    ));

    assert_ne!(chained.translate().unwrap(), conjunction.translate().unwrap());
    assert_eq!(
        numbers(chained.to_list().unwrap()),
        numbers(conjunction.to_list().unwrap())
    );
}

/// filter never changes the receiver.
#[test]
fn test_filter_returns_new_query() {
    let articles = setup_articles();
    let all = articles.as_queryable();
    let narrowed = all.filter(category_contains("Demo"));

    assert_eq!(all.translate().unwrap(), Query::All);
    assert_eq!(all.to_list().unwrap().len(), 4);
    assert_eq!(numbers(narrowed.to_list().unwrap()), vec![2]);
}

// =============================================================================
// Membership Tests
// =============================================================================

/// `ids.Contains(a.ArticleNumber)` and `ids.Any(x => a.ArticleNumber == x)`
/// select the same documents.
#[test]
fn test_membership_equivalence() {
    let articles = setup_articles();
    let a = a();
    let x = Parameter::new("x", ExprType::Int);

    let contains = articles.as_queryable().filter(Lambda::new(
        [a.clone()],
        Expr::enumerable_contains(int_list(&[2, 4]), number(&a)),
    ));
    let any = articles.as_queryable().filter(Lambda::new(
        [a.clone()],
        Expr::any(
            int_list(&[2, 4]),
            Lambda::new([x.clone()], Expr::eq(number(&a), x.clone())),
        ),
    ));

    assert_eq!(numbers(contains.to_list().unwrap()), vec![2, 4]);
    assert_eq!(numbers(any.to_list().unwrap()), vec![2, 4]);
}

/// Negated membership selects the complement.
#[test]
fn test_negated_membership() {
    let articles = setup_articles();
    let a = a();

    let found = articles
        .find(Lambda::new(
            [a.clone()],
            Expr::not(Expr::enumerable_contains(int_list(&[2, 4]), number(&a))),
        ))
        .unwrap();

    assert_eq!(numbers(found), vec![1, 3]);
}

/// All over a list is a pure conjunction; an empty list holds vacuously.
#[test]
fn test_all_over_list() {
    let articles = setup_articles();
    let a = a();
    let x = Parameter::new("x", ExprType::Int);
    let none_of = |ids: &[i64]| {
        Lambda::new(
            [a.clone()],
            Expr::all(
                int_list(ids),
                Lambda::new([x.clone()], Expr::not_eq(number(&a), x.clone())),
            ),
        )
    };

    assert_eq!(numbers(articles.find(none_of(&[1, 2, 3])).unwrap()), vec![4]);
    assert_eq!(numbers(articles.find(none_of(&[])).unwrap()), vec![1, 2, 3, 4]);
}

/// An empty Any list matches nothing.
#[test]
fn test_empty_any_list() {
    let articles = setup_articles();
    let a = a();
    let x = Parameter::new("x", ExprType::Int);

    let found = articles
        .find(Lambda::new(
            [a.clone()],
            Expr::any(int_list(&[]), Lambda::new([x.clone()], Expr::eq(number(&a), x))),
        ))
        .unwrap();

    assert!(found.is_empty());
}

// =============================================================================
// Nested Collection Tests
// =============================================================================

/// `a.Allergeens.Any(x => x.Code == "A")` reaches into the embedded array.
#[test]
fn test_nested_any() {
    let articles = setup_articles();
    let a = a();
    let x = Parameter::new("x", ExprType::Entity("Allergeen".into()));

    let query = articles.as_queryable().filter(Lambda::new(
        [a.clone()],
        Expr::any(
            allergeens(&a),
            Lambda::new(
                [x.clone()],
                Expr::eq(x.member("Code", ExprType::String), Expr::string("A")),
            ),
        ),
    ));

    assert_eq!(
        query.translate().unwrap(),
        Query::and(Query::All, Query::eq("Allergeens.Code", json!("A")))
    );
    assert_eq!(numbers(query.to_list().unwrap()), vec![1, 4]);
}

/// A list quantifier wrapping a nested field quantifier.
#[test]
fn test_list_of_codes_against_nested_field() {
    let articles = setup_articles();
    let a = a();
    let c = Parameter::new("c", ExprType::String);
    let x = Parameter::new("x", ExprType::Entity("Allergeen".into()));
    let codes = Expr::local("codes", ExprType::collection_of(ExprType::String), json!(["B", "C"]));

    let found = articles
        .find(Lambda::new(
            [a.clone()],
            Expr::any(
                codes,
                Lambda::new(
                    [c.clone()],
                    Expr::any(
                        allergeens(&a),
                        Lambda::new(
                            [x.clone()],
                            Expr::eq(x.member("Code", ExprType::String), c.clone()),
                        ),
                    ),
                ),
            ),
        ))
        .unwrap();

    assert_eq!(numbers(found), vec![1, 2]);
}

// =============================================================================
// Materialization Tests
// =============================================================================

/// Each materialization re-reads the store.
#[test]
fn test_materialization_is_not_cached() {
    let articles = setup_articles();
    let query = articles.as_queryable().filter(category_contains("Test"));

    assert_eq!(numbers(query.to_list().unwrap()), vec![1, 3]);
    assert_eq!(numbers(query.to_list().unwrap()), vec![1, 3]);

    articles.insert(&article(5, "Test", &[])).unwrap();
    assert_eq!(numbers(query.to_list().unwrap()), vec![1, 3, 5]);
    assert_eq!(articles.metrics().queries_executed, 3);
}

/// Building queries performs no translation and no reads.
#[test]
fn test_building_is_lazy() {
    let articles = setup_articles();
    let _query = articles
        .as_queryable()
        .filter(category_contains("e"))
        .filter(category_contains("s"));

    let metrics = articles.metrics();
    assert_eq!(metrics.queries_translated, 0);
    assert_eq!(metrics.queries_executed, 0);
}

/// Results stream lazily through the entity iterator.
#[test]
fn test_iter_yields_entities() {
    let articles = setup_articles();
    let mut iter = articles.as_queryable().iter().unwrap();

    let first = iter.next().unwrap().unwrap();
    assert_eq!(first, article(1, "Test", &["A", "B"]));
    assert_eq!(iter.count(), 3);
}

/// Untyped queries resolve their element type from the expression.
#[test]
fn test_create_query_from_expression() {
    let articles = setup_articles();
    let provider = articles.provider();

    let untyped = provider
        .clone()
        .create_query(Expr::query_root("Article"))
        .unwrap()
        .filter(category_contains("Demo"));
    assert_eq!(untyped.element_type(), "Article");

    let documents = untyped.to_list().unwrap();
    assert_eq!(documents, vec![json!({"_id": 2, "Category": "Demo", "Allergeens": [{"Code": "C"}]})]);

    let typed: Vec<Article> = untyped.typed().to_list().unwrap();
    assert_eq!(numbers(typed), vec![2]);

    let err = provider.create_query(Expr::int(1)).unwrap_err();
    assert!(matches!(err, QueryError::UnknownElementType(_)));
}

// =============================================================================
// Rejection Tests
// =============================================================================

/// An unmapped member fails at materialization, before any read.
#[test]
fn test_unmapped_member_is_rejected() {
    let articles = setup_articles();
    let a = a();

    let query = articles.as_queryable().filter(Lambda::new(
        [a.clone()],
        Expr::eq(a.member("Price", ExprType::Double), Expr::double(1.0)),
    ));

    let err = query.to_list().unwrap_err();
    assert!(matches!(
        err,
        QueryError::Translate(TranslateError::PropertyNotMapped(ref path)) if path == "Price"
    ));

    let metrics = articles.metrics();
    assert_eq!(metrics.queries_rejected, 1);
    assert_eq!(metrics.queries_executed, 0);
    assert_eq!(metrics.documents_read, 0);
}

/// All over a nested collection field is a documented gap.
#[test]
fn test_all_over_nested_field_is_not_supported() {
    let articles = setup_articles();
    let a = a();
    let x = Parameter::new("x", ExprType::Entity("Allergeen".into()));

    let err = articles
        .find(Lambda::new(
            [a.clone()],
            Expr::all(
                allergeens(&a),
                Lambda::new(
                    [x.clone()],
                    Expr::eq(x.member("Code", ExprType::String), Expr::string("A")),
                ),
            ),
        ))
        .unwrap_err();

    assert_eq!(err.code(), "AERO_QUERY_NOT_SUPPORTED");
    assert!(err.is_translation());
}

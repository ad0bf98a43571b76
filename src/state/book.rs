// Book record model
// Contains the stored record and the raw request payload it is built from

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

/// Unique identifier for a book
pub type BookId = String;

/// Book record
/// Represents one entry on the shelf as it is stored and returned
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, generated at creation
    pub id: BookId,
    /// Title of the book
    pub name: String,
    /// Publication year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    /// Author name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Short description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Publisher name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Total number of pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<i64>,
    /// Number of pages read so far, never above `page_count`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_page: Option<i64>,
    /// Whether every page has been read
    pub finished: bool,
    /// Whether the book is currently being read, as reported by the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<bool>,
    /// Set once at creation
    #[serde(serialize_with = "serialize_timestamp")]
    pub inserted_at: DateTime<Utc>,
    /// Refreshed on every successful update
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Typed attributes of a book that a client controls
///
/// Produced from a [`BookPayload`] once it has passed validation.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)] // Mirrors the documented attributes of `Book`
pub struct BookFields {
    pub name: String,
    pub year: Option<i64>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: Option<i64>,
    pub read_page: Option<i64>,
    pub reading: Option<bool>,
}

impl Book {
    /// Create a new book from validated fields
    /// Stamps both timestamps with `now` and derives `finished`
    pub fn new(id: BookId, fields: BookFields, now: DateTime<Utc>) -> Self {
        let mut book = Self {
            id,
            name: String::new(),
            year: None,
            author: None,
            summary: None,
            publisher: None,
            page_count: None,
            read_page: None,
            finished: false,
            reading: None,
            inserted_at: now,
            updated_at: now,
        };
        book.apply(fields, now);
        book.refresh_finished();
        book
    }

    /// Generate a new unique ID for a book
    /// Uses UUID v4 for uniqueness
    pub fn generate_id() -> BookId {
        Uuid::new_v4().to_string()
    }

    /// Replace every client-controlled attribute and bump `updated_at`
    ///
    /// `finished` is left untouched; callers decide whether to re-derive it.
    pub fn apply(&mut self, fields: BookFields, now: DateTime<Utc>) {
        self.name = fields.name;
        self.year = fields.year;
        self.author = fields.author;
        self.summary = fields.summary;
        self.publisher = fields.publisher;
        self.page_count = fields.page_count;
        self.read_page = fields.read_page;
        self.reading = fields.reading;
        self.updated_at = now;
    }

    /// Re-derive `finished` from the page counters
    /// A book without both counters is never finished
    pub fn refresh_finished(&mut self) {
        self.finished = matches!(
            (self.page_count, self.read_page),
            (Some(page_count), Some(read_page)) if page_count == read_page
        );
    }
}

/// Render timestamps as ISO-8601 UTC with millisecond precision
fn serialize_timestamp<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Raw request payload for create and update
///
/// Fields stay untyped so falsy and type checks can run in a fixed order
/// before anything is converted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)] // Mirrors the documented attributes of `Book`
pub struct BookPayload {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub author: Option<Value>,
    #[serde(default)]
    pub summary: Option<Value>,
    #[serde(default)]
    pub publisher: Option<Value>,
    #[serde(default)]
    pub page_count: Option<Value>,
    #[serde(default)]
    pub read_page: Option<Value>,
    #[serde(default)]
    pub reading: Option<Value>,
}

impl BookPayload {
    /// True when every attribute required at creation is present and truthy
    pub fn has_required_fields(&self) -> bool {
        [
            &self.name,
            &self.year,
            &self.author,
            &self.summary,
            &self.publisher,
            &self.page_count,
            &self.read_page,
        ]
        .iter()
        .all(|field| field.as_ref().is_some_and(is_truthy))
    }

    /// True when both page counters are present and are whole numbers
    pub fn has_integer_page_counters(&self) -> bool {
        let is_integer = |field: &Option<Value>| field.as_ref().and_then(whole_number).is_some();
        is_integer(&self.page_count) && is_integer(&self.read_page)
    }

    /// True when both page counters are numeric and `readPage > pageCount`
    ///
    /// Numeric strings are compared by value. Missing or non-numeric counters
    /// never compare as greater.
    pub fn read_page_exceeds_page_count(&self) -> bool {
        let as_number = |field: &Option<Value>| field.as_ref().and_then(numeric_value);
        match (as_number(&self.read_page), as_number(&self.page_count)) {
            (Some(read_page), Some(page_count)) => read_page > page_count,
            _ => false,
        }
    }

    /// True when `name` is present and truthy
    pub fn has_name(&self) -> bool {
        self.name.as_ref().is_some_and(is_truthy)
    }

    /// Convert into typed fields
    ///
    /// `null`, `false` and empty strings become absent. Returns `Err` with the
    /// offending key when a truthy value has the wrong JSON type.
    pub fn into_fields(self) -> Result<BookFields, &'static str> {
        let name = string_field(self.name, "name")?.ok_or("name")?;
        Ok(BookFields {
            name,
            year: integer_field(self.year, "year")?,
            author: string_field(self.author, "author")?,
            summary: string_field(self.summary, "summary")?,
            publisher: string_field(self.publisher, "publisher")?,
            page_count: integer_field(self.page_count, "pageCount")?,
            read_page: integer_field(self.read_page, "readPage")?,
            reading: boolean_field(self.reading, "reading")?,
        })
    }
}

/// Loose truthiness for JSON values
///
/// `null`, `false`, `0` and `""` are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whole number carried by a JSON number, if it fits in an `i64`
///
/// Accepts integral floats such as `100.0`.
pub fn whole_number(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Numeric reading of a JSON value for ordering comparisons
///
/// Numbers compare as themselves, strings by their parsed value (blank is 0).
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn string_field(value: Option<Value>, key: &'static str) -> Result<Option<String>, &'static str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(Some(s)),
        Some(v) if is_truthy(&v) => Err(key),
        _ => Ok(None),
    }
}

// Zero is kept: it is a real value for counters that passed validation.
fn integer_field(value: Option<Value>, key: &'static str) -> Result<Option<i64>, &'static str> {
    match value {
        Some(v @ Value::Number(_)) => whole_number(&v).map(Some).ok_or(key),
        Some(v) if is_truthy(&v) => Err(key),
        _ => Ok(None),
    }
}

fn boolean_field(value: Option<Value>, key: &'static str) -> Result<Option<bool>, &'static str> {
    match value {
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(v) if is_truthy(&v) => Err(key),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> BookPayload {
        serde_json::from_value(value).unwrap()
    }

    fn complete() -> Value {
        json!({
            "name": "A",
            "year": 2020,
            "author": "X",
            "summary": "s",
            "publisher": "P",
            "pageCount": 100,
            "readPage": 25
        })
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_required_fields() {
        assert!(payload(complete()).has_required_fields());

        let mut missing = complete();
        missing.as_object_mut().unwrap().remove("summary");
        assert!(!payload(missing).has_required_fields());

        let mut zero_read = complete();
        zero_read["readPage"] = json!(0);
        assert!(!payload(zero_read).has_required_fields());
    }

    #[test]
    fn test_integer_page_counters() {
        assert!(payload(complete()).has_integer_page_counters());

        let mut text = complete();
        text["pageCount"] = json!("100");
        assert!(!payload(text).has_integer_page_counters());

        let mut fraction = complete();
        fraction["readPage"] = json!(1.5);
        assert!(!payload(fraction).has_integer_page_counters());
    }

    #[test]
    fn test_read_page_comparison() {
        let mut over = complete();
        over["readPage"] = json!(150);
        assert!(payload(over).read_page_exceeds_page_count());
        assert!(!payload(complete()).read_page_exceeds_page_count());
        // Absent counters never compare as greater
        assert!(!payload(json!({ "name": "A", "readPage": 10 })).read_page_exceeds_page_count());
    }

    #[test]
    fn test_into_fields() {
        let mut value = complete();
        value["reading"] = json!(true);
        let fields = payload(value).into_fields().unwrap();
        assert_eq!(fields.name, "A");
        assert_eq!(fields.year, Some(2020));
        assert_eq!(fields.page_count, Some(100));
        assert_eq!(fields.read_page, Some(25));
        assert_eq!(fields.reading, Some(true));

        let fields = payload(json!({ "name": "Only" })).into_fields().unwrap();
        assert_eq!(fields.author, None);
        assert_eq!(fields.reading, None);

        assert_eq!(payload(json!({ "name": "A", "year": "2020" })).into_fields(), Err("year"));
        assert_eq!(payload(json!({ "name": 7 })).into_fields(), Err("name"));
    }

    #[test]
    fn test_book_new_derives_finished() {
        let now = Utc::now();
        let mut fields = payload(complete()).into_fields().unwrap();
        let book = Book::new("1".to_string(), fields.clone(), now);
        assert!(!book.finished);
        assert_eq!(book.inserted_at, book.updated_at);

        fields.read_page = Some(100);
        let book = Book::new("2".to_string(), fields, now);
        assert!(book.finished);
    }

    #[test]
    fn test_book_serialization() {
        let now = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let fields = payload(complete()).into_fields().unwrap();
        let book = Book::new("abc".to_string(), fields, now);
        let json = serde_json::to_value(&book).unwrap();

        assert_eq!(json["id"], "abc");
        assert_eq!(json["pageCount"], 100);
        assert_eq!(json["readPage"], 25);
        assert_eq!(json["finished"], false);
        assert_eq!(json["insertedAt"], "2024-01-02T03:04:05.000Z");
        assert_eq!(json["updatedAt"], "2024-01-02T03:04:05.000Z");
        assert!(json.get("reading").is_none());
    }

    #[test]
    fn test_book_generate_id() {
        let id1 = Book::generate_id();
        let id2 = Book::generate_id();
        assert_ne!(id1, id2);
        assert!(!id1.is_empty());
    }

    #[test]
    fn test_integral_float_counters() {
        let mut value = complete();
        value["pageCount"] = json!(100.0);
        value["readPage"] = json!(50);
        value["year"] = json!(2020.0);
        let payload = payload(value);
        assert!(payload.has_integer_page_counters());

        let fields = payload.into_fields().unwrap();
        assert_eq!(fields.page_count, Some(100));
        assert_eq!(fields.read_page, Some(50));
        assert_eq!(fields.year, Some(2020));
    }

    #[test]
    fn test_whole_number() {
        assert_eq!(whole_number(&json!(7)), Some(7));
        assert_eq!(whole_number(&json!(-3.0)), Some(-3));
        assert_eq!(whole_number(&json!(1.5)), None);
        assert_eq!(whole_number(&json!(1e300)), None);
        assert_eq!(whole_number(&json!(u64::MAX)), None);
        assert_eq!(whole_number(&json!("7")), None);
    }

    #[test]
    fn test_read_page_comparison_with_numeric_strings() {
        let over = payload(json!({ "name": "B", "pageCount": 100, "readPage": "150" }));
        assert!(over.read_page_exceeds_page_count());

        let under = payload(json!({ "name": "B", "pageCount": " 100 ", "readPage": 99 }));
        assert!(!under.read_page_exceeds_page_count());

        let text = payload(json!({ "name": "B", "pageCount": 100, "readPage": "many" }));
        assert!(!text.read_page_exceeds_page_count());

        let absent = payload(json!({ "name": "B", "readPage": "150" }));
        assert!(!absent.read_page_exceeds_page_count());
    }

    #[test]
    fn test_refresh_finished_requires_both_counters() {
        let now = Utc::now();
        let mut book = Book::new("1".to_string(), BookFields::default(), now);
        assert!(!book.finished);

        book.page_count = Some(10);
        book.read_page = Some(10);
        book.refresh_finished();
        assert!(book.finished);

        book.page_count = None;
        book.read_page = None;
        book.refresh_finished();
        assert!(!book.finished);
    }
}

//! Random documents shaped by a JSON Schema.
//!
//! The generator walks the schema and produces a value for every keyword it
//! understands. It aims for documents that validate, but does not promise
//! it: keyword interactions such as overlapping `oneOf` branches or
//! `not` are not solved for. Callers must validate the output.

use pubschema_core::Schema;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Number, Value};

use crate::{pattern, text, ItemGenerator};

/// Nesting depth after which optional properties are dropped and arrays
/// shrink to their minimum length.
pub const MAX_DEPTH: usize = 12;

/// Hard stop on nesting, reached only by schemas whose required
/// properties recurse through `$ref`.
const ABORT_DEPTH: usize = 64;

/// Extra array elements generated beyond `minItems` when no `maxItems`
/// is given.
const DEFAULT_ARRAY_SPREAD: u64 = 3;

/// Default integer range width when the schema leaves a side open.
const DEFAULT_NUMBER_SPREAD: i64 = 1000;

/// Redraws per element before giving up on `uniqueItems`.
const UNIQUE_ATTEMPTS: usize = 10;

/// Largest `minItems` the generator will satisfy; beyond it the array is
/// replaced by `null`.
const MAX_ARRAY_ITEMS: u64 = 256;

/// Largest `minLength` the generator will satisfy; beyond it the string is
/// replaced by `null`.
const MAX_TEXT_LENGTH: usize = 4096;

/// Widest float range sampled from. Wider ranges are narrowed to this
/// width starting at their lower bound.
const MAX_FLOAT_SPAN: f64 = 1.0e12;

/// Item schema used when an array declares no `items`.
static ANY_ITEM: Value = Value::Bool(true);

/// Produces random candidate documents for one schema.
#[derive(Debug, Clone)]
pub struct RandomItemGenerator {
    schema: Schema,
    rng: StdRng,
}

impl RandomItemGenerator {
    /// Generator seeded from operating system entropy.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rng: StdRng::from_entropy(),
        }
    }

    /// Generator with a fixed seed. The same seed and schema produce the
    /// same sequence of documents.
    pub fn with_seed(schema: Schema, seed: u64) -> Self {
        Self {
            schema,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The schema documents are generated for.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// One random document.
    pub fn payload(&mut self) -> Value {
        let root = self.schema.as_value();
        let mut walker = Walker {
            root,
            rng: &mut self.rng,
        };
        walker.value(root, 0)
    }
}

impl ItemGenerator for RandomItemGenerator {
    fn generate(&mut self) -> Value {
        self.payload()
    }
}

struct Walker<'a, R: Rng> {
    root: &'a Value,
    rng: &'a mut R,
}

impl<'a, R: Rng> Walker<'a, R> {
    fn value(&mut self, node: &Value, depth: usize) -> Value {
        if depth > ABORT_DEPTH {
            return Value::Null;
        }
        let obj = match node {
            Value::Object(obj) => obj,
            Value::Bool(true) => return Value::String(text::word(self.rng).to_string()),
            _ => return Value::Null,
        };

        if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
            return match self.lookup(reference) {
                Some(target) => self.value(target, depth + 1),
                None => Value::Null,
            };
        }
        if let Some(constant) = obj.get("const") {
            return constant.clone();
        }
        if let Some(Value::Array(options)) = obj.get("enum") {
            return self.choose(options).cloned().unwrap_or(Value::Null);
        }
        for keyword in ["oneOf", "anyOf"] {
            if let Some(Value::Array(branches)) = obj.get(keyword) {
                if let Some(branch) = self.choose(branches) {
                    let merged = self.merge_branch(obj, keyword, branch);
                    return self.value(&merged, depth + 1);
                }
            }
        }
        if let Some(Value::Array(parts)) = obj.get("allOf") {
            let merged = self.merge_all_of(obj, parts);
            return self.value(&merged, depth + 1);
        }

        match self.pick_type(obj).as_str() {
            "object" => self.object(obj, depth),
            "array" => self.array(obj, depth),
            "string" => self.string(obj).map_or(Value::Null, Value::String),
            "integer" => self.integer(obj),
            "number" => self.number(obj),
            "boolean" => Value::Bool(self.rng.gen_bool(0.5)),
            _ => Value::Null,
        }
    }

    /// Resolve a local `$ref` (`#/definitions/x`, `#/$defs/x`, `#`).
    fn lookup(&self, reference: &str) -> Option<&'a Value> {
        let pointer = reference.strip_prefix('#')?;
        if pointer.is_empty() {
            return Some(self.root);
        }
        self.root.pointer(pointer)
    }

    fn choose<'v, T>(&mut self, items: &'v [T]) -> Option<&'v T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rng.gen_range(0..items.len())])
        }
    }

    fn pick_type(&mut self, obj: &Map<String, Value>) -> String {
        match obj.get("type") {
            Some(Value::String(t)) => t.clone(),
            Some(Value::Array(types)) => self
                .choose(types)
                .and_then(Value::as_str)
                .unwrap_or("null")
                .to_string(),
            _ if obj.contains_key("properties") || obj.contains_key("required") => {
                "object".to_string()
            }
            _ if obj.contains_key("items") => "array".to_string(),
            _ => "string".to_string(),
        }
    }

    /// Follow `node`'s `$ref`, if it has a resolvable one.
    fn resolve<'v>(&self, node: &'v Value) -> &'v Value
    where
        'a: 'v,
    {
        match node.get("$ref").and_then(Value::as_str) {
            Some(r) => self.lookup(r).unwrap_or(node),
            None => node,
        }
    }

    /// Fold `allOf` parts into one schema.
    fn merge_all_of(&self, obj: &Map<String, Value>, parts: &[Value]) -> Value {
        let mut merged = obj.clone();
        merged.remove("allOf");
        for part in parts {
            if let Value::Object(part) = self.resolve(part) {
                merge_into(&mut merged, part);
            }
        }
        Value::Object(merged)
    }

    /// A `oneOf`/`anyOf` branch combined with the keywords next to the
    /// combinator, so `{"type": "object", "required": [..], "oneOf": [..]}`
    /// keeps its outer constraints.
    fn merge_branch(&self, obj: &Map<String, Value>, keyword: &str, branch: &Value) -> Value {
        match self.resolve(branch) {
            Value::Object(branch) => {
                let mut merged = obj.clone();
                merged.remove(keyword);
                merge_into(&mut merged, branch);
                Value::Object(merged)
            }
            other => other.clone(),
        }
    }

    fn object(&mut self, obj: &Map<String, Value>, depth: usize) -> Value {
        let empty = Map::new();
        let properties = obj
            .get("properties")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        let required: Vec<&str> = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        let min_properties = uint(obj, "minProperties").unwrap_or(0) as usize;

        let mut out = Map::new();
        for (key, sub) in properties {
            let include = required.contains(&key.as_str())
                || (depth < MAX_DEPTH && self.rng.gen_bool(0.5));
            if include {
                let v = self.value(sub, depth + 1);
                out.insert(key.clone(), v);
            }
        }
        for (key, sub) in properties {
            if out.len() >= min_properties {
                break;
            }
            if !out.contains_key(key) {
                let v = self.value(sub, depth + 1);
                out.insert(key.clone(), v);
            }
        }

        // Required keys with no declared property schema.
        let extra = obj.get("additionalProperties");
        for key in required {
            if !out.contains_key(key) {
                let v = match extra {
                    Some(schema @ Value::Object(_)) => self.value(schema, depth + 1),
                    _ => Value::String(text::word(self.rng).to_string()),
                };
                out.insert(key.to_string(), v);
            }
        }

        if properties.is_empty() && depth < MAX_DEPTH {
            self.pattern_properties(obj, depth, &mut out);
        }
        Value::Object(out)
    }

    fn pattern_properties(
        &mut self,
        obj: &Map<String, Value>,
        depth: usize,
        out: &mut Map<String, Value>,
    ) {
        if let Some(Value::Object(patterns)) = obj.get("patternProperties") {
            for (key_pattern, sub) in patterns {
                let count = self.rng.gen_range(0..=2);
                for _ in 0..count {
                    if let Some(key) = pattern::sample(key_pattern, self.rng) {
                        let v = self.value(sub, depth + 1);
                        out.insert(key, v);
                    }
                }
            }
        } else if let Some(sub @ Value::Object(_)) = obj.get("additionalProperties") {
            let count = self.rng.gen_range(0..=2);
            for _ in 0..count {
                let key = text::word(self.rng).to_string();
                let v = self.value(sub, depth + 1);
                out.insert(key, v);
            }
        }
    }

    fn array(&mut self, obj: &Map<String, Value>, depth: usize) -> Value {
        let min = uint(obj, "minItems").unwrap_or(0);
        if min > MAX_ARRAY_ITEMS {
            return Value::Null;
        }
        let max = uint(obj, "maxItems")
            .unwrap_or(min + DEFAULT_ARRAY_SPREAD)
            .clamp(min, MAX_ARRAY_ITEMS);
        let len = if depth >= MAX_DEPTH {
            min
        } else {
            self.rng.gen_range(min..=max)
        };
        let unique = obj.get("uniqueItems") == Some(&Value::Bool(true));

        let mut out: Vec<Value> = Vec::new();
        for i in 0..len as usize {
            let item_schema = match obj.get("items") {
                Some(Value::Array(tuple)) => match tuple.get(i) {
                    Some(s) => s,
                    None => break,
                },
                Some(s) => s,
                None => &ANY_ITEM,
            };
            let mut v = self.value(item_schema, depth + 1);
            if unique {
                let mut attempts = 0;
                while out.contains(&v) && attempts < UNIQUE_ATTEMPTS {
                    v = self.value(item_schema, depth + 1);
                    attempts += 1;
                }
                if out.contains(&v) {
                    break;
                }
            }
            out.push(v);
        }
        Value::Array(out)
    }

    fn string(&mut self, obj: &Map<String, Value>) -> Option<String> {
        if let Some(format) = obj.get("format").and_then(Value::as_str) {
            if let Some(s) = text::formatted(self.rng, format) {
                return Some(s);
            }
        }
        if let Some(p) = obj.get("pattern").and_then(Value::as_str) {
            if let Some(s) = pattern::sample(p, self.rng) {
                return Some(s);
            }
        }
        let min = uint(obj, "minLength").unwrap_or(0);
        if min > MAX_TEXT_LENGTH as u64 {
            return None;
        }
        let max = uint(obj, "maxLength").map(|m| m.min(MAX_TEXT_LENGTH as u64) as usize);
        Some(text::text(self.rng, min as usize, max))
    }

    fn integer(&mut self, obj: &Map<String, Value>) -> Value {
        let (lo, hi) = bounds(obj);
        let lo = lo.map(|v| v.ceil() as i64);
        let hi = hi.map(|v| v.floor() as i64);
        let (lo, hi) = match (lo, hi) {
            (Some(l), Some(h)) => (l, h.max(l)),
            (Some(l), None) => (l, l.saturating_add(DEFAULT_NUMBER_SPREAD)),
            (None, Some(h)) => (h.saturating_sub(DEFAULT_NUMBER_SPREAD), h),
            (None, None) => (0, DEFAULT_NUMBER_SPREAD),
        };

        let step = obj
            .get("multipleOf")
            .and_then(Value::as_i64)
            .filter(|m| *m > 0)
            .unwrap_or(1);
        let first = lo.div_euclid(step) + i64::from(lo.rem_euclid(step) != 0);
        let last = hi.div_euclid(step);
        let k = self.rng.gen_range(first..=last.max(first));
        k.checked_mul(step)
            .map_or(Value::Null, |n| Value::Number(Number::from(n)))
    }

    fn number(&mut self, obj: &Map<String, Value>) -> Value {
        let spread = DEFAULT_NUMBER_SPREAD as f64;
        let (lo, hi) = match bounds(obj) {
            (Some(l), Some(h)) => (l, h.max(l)),
            (Some(l), None) => (l, l + spread),
            (None, Some(h)) => (h - spread, h),
            (None, None) => (0.0, spread),
        };
        if !lo.is_finite() || !hi.is_finite() {
            return Value::Null;
        }
        let width = (hi - lo).min(MAX_FLOAT_SPAN);
        let raw = lo + self.rng.gen::<f64>() * width;
        // Two decimal places keeps fixtures readable; stay inside bounds.
        let rounded = (raw * 100.0).round() / 100.0;
        let value = if rounded.is_finite() {
            rounded.clamp(lo, hi)
        } else {
            raw
        };
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

/// Inclusive numeric bounds, tightened for exclusive limits in both the
/// draft-04 (boolean flag) and draft-06+ (numeric) spellings.
fn bounds(obj: &Map<String, Value>) -> (Option<f64>, Option<f64>) {
    const NUDGE: f64 = 0.01;
    let mut lo = obj.get("minimum").and_then(Value::as_f64);
    let mut hi = obj.get("maximum").and_then(Value::as_f64);

    match obj.get("exclusiveMinimum") {
        Some(Value::Bool(true)) => lo = lo.map(|l| l + NUDGE),
        Some(Value::Number(n)) => {
            if let Some(l) = n.as_f64().map(|l| l + NUDGE) {
                lo = Some(lo.map_or(l, |m| m.max(l)));
            }
        }
        _ => {}
    }
    match obj.get("exclusiveMaximum") {
        Some(Value::Bool(true)) => hi = hi.map(|h| h - NUDGE),
        Some(Value::Number(n)) => {
            if let Some(h) = n.as_f64().map(|h| h - NUDGE) {
                hi = Some(hi.map_or(h, |m| m.min(h)));
            }
        }
        _ => {}
    }
    (lo, hi)
}

fn uint(obj: &Map<String, Value>, key: &str) -> Option<u64> {
    obj.get(key).and_then(Value::as_u64)
}

/// Merge `part` into `target`: `properties` and `required` are unioned,
/// every other keyword from `part` wins.
fn merge_into(target: &mut Map<String, Value>, part: &Map<String, Value>) {
    for (key, value) in part {
        let unioned = match (key.as_str(), target.get_mut(key), value) {
            ("properties", Some(Value::Object(existing)), Value::Object(incoming)) => {
                for (k, v) in incoming {
                    existing.insert(k.clone(), v.clone());
                }
                true
            }
            ("required", Some(Value::Array(existing)), Value::Array(incoming)) => {
                for v in incoming {
                    if !existing.contains(v) {
                        existing.push(v.clone());
                    }
                }
                true
            }
            _ => false,
        };
        if !unioned {
            target.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn generate(schema: Value, seed: u64) -> Value {
        RandomItemGenerator::with_seed(Schema::new(schema), seed).payload()
    }

    #[test]
    fn required_properties_always_present() {
        let schema = json!({
            "type": "object",
            "required": ["base_path", "title"],
            "properties": {
                "base_path": {"type": "string"},
                "title": {"type": "string"},
                "description": {"type": "string"}
            }
        });
        for seed in 0..30 {
            let doc = generate(schema.clone(), seed);
            assert!(doc["base_path"].is_string(), "{doc}");
            assert!(doc["title"].is_string(), "{doc}");
        }
    }

    #[test]
    fn optional_properties_sometimes_present() {
        let schema = json!({
            "type": "object",
            "properties": {"description": {"type": "string"}}
        });
        let present = (0..40)
            .filter(|seed| generate(schema.clone(), *seed).get("description").is_some())
            .count();
        assert!(present > 0 && present < 40, "present in {present}/40");
    }

    #[test]
    fn same_seed_same_document() {
        let schema = json!({
            "type": "object",
            "properties": {
                "a": {"type": "integer"},
                "b": {"type": "array", "items": {"type": "string"}},
                "c": {"type": "string", "format": "uuid"}
            }
        });
        assert_eq!(generate(schema.clone(), 42), generate(schema, 42));
    }

    #[test]
    fn enum_and_const() {
        for seed in 0..20 {
            let v = generate(json!({"enum": ["en", "cy"]}), seed);
            assert!(v == json!("en") || v == json!("cy"));
        }
        assert_eq!(generate(json!({"const": {"a": 1}}), 0), json!({"a": 1}));
    }

    #[test]
    fn refs_resolve_against_root() {
        let schema = json!({
            "type": "object",
            "required": ["locale"],
            "properties": {"locale": {"$ref": "#/definitions/locale"}},
            "definitions": {"locale": {"type": "string", "enum": ["en"]}}
        });
        assert_eq!(generate(schema, 1)["locale"], json!("en"));
    }

    #[test]
    fn dangling_ref_is_null() {
        assert_eq!(generate(json!({"$ref": "#/definitions/missing"}), 0), Value::Null);
        assert_eq!(generate(json!({"$ref": "other.json"}), 0), Value::Null);
    }

    #[test]
    fn recursive_required_ref_terminates() {
        let schema = json!({
            "$ref": "#/definitions/node",
            "definitions": {
                "node": {
                    "type": "object",
                    "required": ["child"],
                    "properties": {"child": {"$ref": "#/definitions/node"}}
                }
            }
        });
        let doc = generate(schema, 0);
        assert!(doc.is_object());
    }

    #[test]
    fn array_length_bounds() {
        let schema = json!({"type": "array", "minItems": 2, "maxItems": 4, "items": {"type": "integer"}});
        for seed in 0..30 {
            let doc = generate(schema.clone(), seed);
            let len = doc.as_array().unwrap().len();
            assert!((2..=4).contains(&len), "len {len}");
        }
    }

    #[test]
    fn unique_items_are_unique() {
        let schema = json!({
            "type": "array", "minItems": 3, "maxItems": 3, "uniqueItems": true,
            "items": {"type": "string", "enum": ["a", "b", "c"]}
        });
        for seed in 0..20 {
            let doc = generate(schema.clone(), seed);
            let items = doc.as_array().unwrap();
            for (i, a) in items.iter().enumerate() {
                assert!(!items[i + 1..].contains(a), "duplicate in {doc}");
            }
        }
    }

    #[test]
    fn integer_bounds_and_multiple_of() {
        let schema = json!({"type": "integer", "minimum": 10, "maximum": 50, "multipleOf": 5});
        for seed in 0..30 {
            let n = generate(schema.clone(), seed).as_i64().unwrap();
            assert!((10..=50).contains(&n) && n % 5 == 0, "{n}");
        }
    }

    #[test]
    fn exclusive_bounds() {
        let draft4 = json!({"type": "integer", "minimum": 0, "exclusiveMinimum": true, "maximum": 2, "exclusiveMaximum": true});
        let draft6 = json!({"type": "number", "exclusiveMinimum": 0, "exclusiveMaximum": 1});
        for seed in 0..30 {
            assert_eq!(generate(draft4.clone(), seed), json!(1));
            let x = generate(draft6.clone(), seed).as_f64().unwrap();
            assert!(x > 0.0 && x < 1.0, "{x}");
        }
    }

    #[test]
    fn negative_maximum_without_minimum() {
        let plain = json!({"type": "number", "maximum": -5});
        let exclusive = json!({"type": "number", "exclusiveMaximum": -5});
        let integer = json!({"type": "integer", "maximum": -5});
        for seed in 0..30 {
            let x = generate(plain.clone(), seed).as_f64().unwrap();
            assert!(x <= -5.0, "{x}");
            let y = generate(exclusive.clone(), seed).as_f64().unwrap();
            assert!(y < -5.0, "{y}");
            let n = generate(integer.clone(), seed).as_i64().unwrap();
            assert!(n <= -5, "{n}");
        }
    }

    #[test]
    fn tighter_of_maximum_and_numeric_exclusive_maximum() {
        let schema = json!({"type": "number", "minimum": 0, "maximum": 1, "exclusiveMaximum": 10});
        for seed in 0..30 {
            let x = generate(schema.clone(), seed).as_f64().unwrap();
            assert!((0.0..=1.0).contains(&x), "{x}");
        }
    }

    #[test]
    fn extreme_bounds_do_not_panic() {
        let wide = json!({"type": "number", "minimum": -1.7e308, "maximum": 1.7e308});
        let near_max = json!({"type": "integer", "minimum": i64::MAX, "multipleOf": 2});
        let huge_array = json!({"type": "array", "minItems": u64::MAX});
        let huge_string = json!({"type": "string", "minLength": u64::MAX});
        for seed in 0..10 {
            let x = generate(wide.clone(), seed).as_f64().unwrap();
            assert!((-1.7e308..=1.7e308).contains(&x));
            assert_eq!(generate(near_max.clone(), seed), Value::Null);
            assert_eq!(generate(huge_array.clone(), seed), Value::Null);
            assert_eq!(generate(huge_string.clone(), seed), Value::Null);
        }
    }

    #[test]
    fn all_of_merges_object_parts() {
        let schema = json!({
            "allOf": [
                {"$ref": "#/definitions/base"},
                {"required": ["title"], "properties": {"title": {"type": "string"}}}
            ],
            "definitions": {
                "base": {"type": "object", "required": ["base_path"], "properties": {"base_path": {"type": "string"}}}
            }
        });
        let doc = generate(schema, 3);
        assert!(doc["base_path"].is_string() && doc["title"].is_string(), "{doc}");
    }

    #[test]
    fn one_of_keeps_sibling_constraints() {
        let schema = json!({
            "type": "object",
            "required": ["document_type"],
            "properties": {"document_type": {"type": "string"}},
            "oneOf": [
                {"required": ["body"], "properties": {"body": {"type": "string"}}},
                {"required": ["parts"], "properties": {"parts": {"type": "array"}}}
            ]
        });
        for seed in 0..20 {
            let doc = generate(schema.clone(), seed);
            assert!(doc["document_type"].is_string());
            assert!(doc.get("body").is_some() || doc.get("parts").is_some(), "{doc}");
        }
    }

    #[test]
    fn type_arrays_pick_a_member() {
        for seed in 0..20 {
            let v = generate(json!({"type": ["string", "null"]}), seed);
            assert!(v.is_string() || v.is_null());
        }
    }

    #[test]
    fn pattern_properties_generate_matching_keys() {
        let schema = json!({
            "type": "object",
            "minProperties": 0,
            "patternProperties": {"^[a-z_]+$": {"type": "array", "items": {"type": "string", "format": "uuid"}}}
        });
        let re = regex::Regex::new("^[a-z_]+$").unwrap();
        for seed in 0..20 {
            for key in generate(schema.clone(), seed).as_object().unwrap().keys() {
                assert!(re.is_match(key), "{key}");
            }
        }
    }

    #[test]
    fn deep_optional_properties_dropped() {
        let schema = json!({
            "$ref": "#/definitions/node",
            "definitions": {
                "node": {"type": "object", "properties": {"child": {"$ref": "#/definitions/node"}}}
            }
        });
        for seed in 0..10 {
            let mut depth = 0;
            let mut doc = generate(schema.clone(), seed);
            while let Some(child) = doc.get("child").cloned() {
                doc = child;
                depth += 1;
            }
            assert!(depth <= MAX_DEPTH, "depth {depth}");
        }
    }
}

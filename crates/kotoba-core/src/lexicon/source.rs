//! jmdict-simplified JSON records.
//!
//! Each record is decoded on its own so that one malformed word is reported
//! and skipped without failing the document.

use std::fmt;
use std::io::Read;

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

use super::entry::{Entry, Example, Sense, SenseNotes};

/// Decode the words of a dump one at a time and hand each to `visit` with
/// its position. The dump is either `{"words": [...]}` (other keys are
/// skipped) or a bare array of words.
///
/// `visit` returns `false` to stop early, which surfaces as a decode error.
pub(super) fn stream_words<R, F>(reader: R, visit: F) -> serde_json::Result<()>
where
    R: Read,
    F: FnMut(usize, Value) -> bool,
{
    let mut de = serde_json::Deserializer::from_reader(reader);
    (&mut de).deserialize_any(DocumentVisitor { visit })?;
    de.end()
}

fn drain_words<'de, A, F>(mut seq: A, visit: &mut F) -> Result<(), A::Error>
where
    A: SeqAccess<'de>,
    F: FnMut(usize, Value) -> bool,
{
    let mut index = 0;
    while let Some(word) = seq.next_element::<Value>()? {
        if !visit(index, word) {
            return Err(de::Error::custom(format!("stopped at word {index}")));
        }
        index += 1;
    }
    Ok(())
}

struct DocumentVisitor<F> {
    visit: F,
}

impl<'de, F> Visitor<'de> for DocumentVisitor<F>
where
    F: FnMut(usize, Value) -> bool,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of words or an object with a \"words\" array")
    }

    fn visit_seq<A: SeqAccess<'de>>(mut self, seq: A) -> Result<(), A::Error> {
        drain_words(seq, &mut self.visit)
    }

    fn visit_map<A: MapAccess<'de>>(mut self, mut map: A) -> Result<(), A::Error> {
        let mut found = false;
        while let Some(key) = map.next_key::<String>()? {
            if key == "words" && !found {
                map.next_value_seed(WordsSeed {
                    visit: &mut self.visit,
                })?;
                found = true;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        if found {
            Ok(())
        } else {
            Err(de::Error::missing_field("words"))
        }
    }
}

struct WordsSeed<'a, F> {
    visit: &'a mut F,
}

impl<'de, F> DeserializeSeed<'de> for WordsSeed<'_, F>
where
    F: FnMut(usize, Value) -> bool,
{
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, F> Visitor<'de> for WordsSeed<'_, F>
where
    F: FnMut(usize, Value) -> bool,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of words")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<(), A::Error> {
        drain_words(seq, self.visit)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceRecordError {
    #[error("record {index}: missing id")]
    MissingId { index: usize },
    #[error("record {index}: id is not an integer: {value}")]
    InvalidId { index: usize, value: String },
    #[error("record {index} (id {id}): no kana reading")]
    NoKana { index: usize, id: i64 },
    #[error("record {index}: {reason}")]
    Shape { index: usize, reason: String },
}

#[derive(Deserialize)]
struct RawWord {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    kanji: Vec<RawForm>,
    #[serde(default)]
    kana: Vec<RawForm>,
    #[serde(default, alias = "senses")]
    sense: Vec<RawSense>,
}

#[derive(Deserialize)]
struct RawForm {
    text: String,
    #[serde(default)]
    common: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSense {
    #[serde(default)]
    part_of_speech: Vec<String>,
    #[serde(default)]
    related: Value,
    #[serde(default)]
    antonym: Value,
    #[serde(default)]
    field: Value,
    #[serde(default)]
    dialect: Value,
    #[serde(default)]
    misc: Value,
    #[serde(default)]
    info: Value,
    #[serde(default)]
    language_source: Value,
    #[serde(default)]
    gloss: Vec<RawGloss>,
    #[serde(default)]
    examples: Vec<RawExample>,
}

#[derive(Deserialize)]
struct RawGloss {
    text: String,
}

#[derive(Deserialize)]
struct RawExample {
    #[serde(default)]
    sentences: Vec<RawSentence>,
}

#[derive(Deserialize)]
struct RawSentence {
    // The upstream dump spells this key "land".
    #[serde(default, alias = "land")]
    lang: Option<String>,
    text: String,
}

/// A source word converted to store rows.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SourceRecord {
    pub entry: Entry,
    pub senses: Vec<Sense>,
    pub examples: Vec<Example>,
}

fn parse_id(index: usize, id: &Value) -> Result<i64, SourceRecordError> {
    let invalid = || SourceRecordError::InvalidId {
        index,
        value: id.to_string(),
    };
    match id {
        Value::Null => Err(SourceRecordError::MissingId { index }),
        Value::Number(n) => n.as_i64().ok_or_else(invalid),
        Value::String(s) => s.trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Convert the `index`-th word of the dump. Only example sentences tagged
/// with `example_language` are kept.
pub(super) fn convert_record(
    index: usize,
    word: Value,
    example_language: &str,
) -> Result<SourceRecord, SourceRecordError> {
    let raw: RawWord = serde_json::from_value(word).map_err(|e| SourceRecordError::Shape {
        index,
        reason: e.to_string(),
    })?;
    let id = parse_id(index, &raw.id)?;

    let kana_forms: Vec<String> = raw
        .kana
        .iter()
        .filter(|k| !k.text.is_empty())
        .map(|k| k.text.clone())
        .collect();
    if kana_forms.is_empty() {
        return Err(SourceRecordError::NoKana { index, id });
    }
    let is_common = raw.kana.iter().any(|k| k.common);
    let kanji_forms = raw
        .kanji
        .into_iter()
        .map(|k| k.text)
        .filter(|t| !t.is_empty())
        .collect();

    let mut senses = Vec::with_capacity(raw.sense.len());
    let mut examples = Vec::new();
    for (ordinal, sense) in raw.sense.into_iter().enumerate() {
        for example in sense.examples {
            for sentence in example.sentences {
                if sentence.lang.as_deref() == Some(example_language) {
                    examples.push(Example {
                        sense_ordinal: ordinal as i64,
                        text: sentence.text,
                    });
                }
            }
        }
        senses.push(Sense {
            parts_of_speech: sense.part_of_speech,
            glosses: sense.gloss.into_iter().map(|g| g.text).collect(),
            notes: SenseNotes {
                related: sense.related,
                antonym: sense.antonym,
                field: sense.field,
                dialect: sense.dialect,
                misc: sense.misc,
                info: sense.info,
                language_source: sense.language_source,
            },
        });
    }

    Ok(SourceRecord {
        entry: Entry {
            id,
            kanji_forms,
            kana_forms,
            is_common,
        },
        senses,
        examples,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn convert(word: Value) -> Result<SourceRecord, SourceRecordError> {
        convert_record(0, word, "jpn")
    }

    #[test]
    fn convert_full_record() {
        let record = convert(json!({
            "id": "1464530",
            "kanji": [{"text": "日本", "common": true, "tags": []}],
            "kana": [{"text": "にほん", "common": true}, {"text": "にっぽん", "common": false}],
            "sense": [{
                "partOfSpeech": ["n"],
                "related": [],
                "misc": ["uk"],
                "gloss": [{"lang": "eng", "text": "Japan"}],
                "examples": [{"sentences": [
                    {"land": "jpn", "text": "日本に行く。"},
                    {"land": "eng", "text": "I go to Japan."}
                ]}]
            }]
        }))
        .unwrap();

        assert_eq!(record.entry.id, 1464530);
        assert_eq!(record.entry.kanji_forms, vec!["日本"]);
        assert_eq!(record.entry.kana_forms, vec!["にほん", "にっぽん"]);
        assert!(record.entry.is_common);
        assert_eq!(record.senses.len(), 1);
        assert_eq!(record.senses[0].glosses, vec!["Japan"]);
        assert_eq!(record.senses[0].notes.misc, json!(["uk"]));
        assert_eq!(
            record.examples,
            vec![Example {
                sense_ordinal: 0,
                text: "日本に行く。".to_string()
            }]
        );
    }

    #[test]
    fn common_comes_from_kana_only() {
        let record = convert(json!({
            "id": 2,
            "kanji": [{"text": "猫", "common": true}],
            "kana": [{"text": "ねこ", "common": false}]
        }))
        .unwrap();
        assert!(!record.entry.is_common);
        assert!(record.senses.is_empty());
    }

    #[test]
    fn lang_key_and_senses_alias() {
        let record = convert(json!({
            "id": 3,
            "kana": [{"text": "いぬ"}],
            "senses": [
                {"gloss": [{"text": "dog"}]},
                {"gloss": [{"text": "spy"}], "examples": [{"sentences": [{"lang": "jpn", "text": "犬だ。"}]}]}
            ]
        }))
        .unwrap();
        assert_eq!(record.senses.len(), 2);
        assert_eq!(record.examples[0].sense_ordinal, 1);
    }

    #[test]
    fn missing_id() {
        let err = convert(json!({"kana": [{"text": "あ"}]})).unwrap_err();
        assert!(matches!(err, SourceRecordError::MissingId { index: 0 }));
    }

    #[test]
    fn non_numeric_id() {
        let err = convert(json!({"id": "abc", "kana": [{"text": "あ"}]})).unwrap_err();
        assert!(matches!(err, SourceRecordError::InvalidId { .. }));
        let err = convert(json!({"id": 1.5, "kana": [{"text": "あ"}]})).unwrap_err();
        assert!(matches!(err, SourceRecordError::InvalidId { .. }));
    }

    #[test]
    fn no_kana() {
        let err = convert(json!({"id": 5, "kanji": [{"text": "字"}]})).unwrap_err();
        assert!(matches!(err, SourceRecordError::NoKana { id: 5, .. }));
        let err = convert(json!({"id": 5, "kana": [{"text": ""}]})).unwrap_err();
        assert!(matches!(err, SourceRecordError::NoKana { .. }));
    }

    #[test]
    fn wrong_shape() {
        let err = convert(json!({"id": 6, "kana": "にほん"})).unwrap_err();
        assert!(matches!(err, SourceRecordError::Shape { .. }));
        let err = convert(json!("not an object")).unwrap_err();
        assert!(matches!(err, SourceRecordError::Shape { .. }));
    }

    fn count_words(text: &str) -> serde_json::Result<usize> {
        let mut count = 0;
        stream_words(text.as_bytes(), |_, _| {
            count += 1;
            true
        })?;
        Ok(count)
    }

    #[test]
    fn document_shapes() {
        assert_eq!(
            count_words(r#"{"version": "3", "words": [{}], "tags": {"n": "noun"}}"#).unwrap(),
            1
        );
        assert_eq!(count_words("[{}, {}, 42]").unwrap(), 3);
        assert_eq!(count_words(r#"{"words": []}"#).unwrap(), 0);
    }

    #[test]
    fn document_errors() {
        assert!(count_words(r#"{"version": "3"}"#).is_err());
        assert!(count_words(r#"{"words": 3}"#).is_err());
        assert!(count_words(r#"{"words": [{}, "#).is_err());
        assert!(count_words("[] trailing").is_err());
        assert!(count_words("\"text\"").is_err());
    }

    #[test]
    fn words_arrive_in_order_and_can_stop() {
        let mut seen = Vec::new();
        let result = stream_words(r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#.as_bytes(), |index, word| {
            seen.push((index, word["id"].as_i64()));
            index < 1
        });
        assert!(result.is_err());
        assert_eq!(seen, vec![(0, Some(1)), (1, Some(2))]);
    }
}

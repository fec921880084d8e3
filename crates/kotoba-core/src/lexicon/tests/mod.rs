
use serde_json::{json, Value};

use super::{IngestOptions, Lexicon};

pub(super) fn options() -> IngestOptions {
    IngestOptions {
        example_language: "jpn".to_string(),
        batch_size: 4,
    }
}

pub(super) fn word(id: i64, kanji: &[&str], kana: &str, common: bool, glosses: &[&str]) -> Value {
    json!({
        "id": id.to_string(),
        "kanji": kanji.iter().map(|k| json!({"common": common, "text": k, "tags": []})).collect::<Vec<_>>(),
        "kana": [{"common": common, "text": kana, "tags": [], "appliesToKanji": ["*"]}],
        "sense": [{
            "partOfSpeech": ["n"],
            "appliesToKanji": ["*"],
            "appliesToKana": ["*"],
            "related": [],
            "antonym": [],
            "field": [],
            "dialect": [],
            "misc": [],
            "info": [],
            "languageSource": [],
            "gloss": glosses.iter().map(|g| json!({"lang": "eng", "text": g})).collect::<Vec<_>>()
        }]
    })
}

/// Ten words, three of them common (ids 2, 5 and 8).
pub(super) fn fixture_document() -> Value {
    let mut nihon = word(5, &["日本"], "にほん", true, &["Japan"]);
    nihon["sense"][0]["examples"] = json!([{
        "source": {"type": "tatoeba", "value": "1"},
        "text": "日本",
        "sentences": [
            {"land": "jpn", "text": "日本に行きたい。"},
            {"land": "eng", "text": "I want to go to Japan."}
        ]
    }]);

    let mut fire = word(10, &["火"], "ひ", false, &["fire"]);
    fire["sense"].as_array_mut().unwrap().push(json!({
        "partOfSpeech": ["n", "n-suf"],
        "gloss": [{"text": "flame"}, {"text": "fire"}, {"text": "blaze"}]
    }));

    json!({
        "version": "3.6.1",
        "languages": ["eng"],
        "words": [
            word(1, &["本"], "ほん", false, &["book"]),
            word(2, &["猫"], "ねこ", true, &["cat"]),
            word(3, &["子猫"], "こねこ", false, &["kitten"]),
            word(4, &["犬"], "いぬ", false, &["dog"]),
            nihon,
            word(6, &["日本語"], "にほんご", false, &["Japanese (language)"]),
            word(7, &["水"], "みず", false, &["water"]),
            word(8, &["山猫"], "やまねこ", true, &["wildcat", "lynx"]),
            word(9, &["百パーセント"], "ひゃくパーセント", false, &["100%"]),
            fire,
        ]
    })
}

pub(super) fn ingest(lexicon: &mut Lexicon, document: &Value) -> super::IngestReport {
    lexicon
        .ingest_reader(document.to_string().as_bytes(), &options())
        .unwrap()
}

pub(super) fn fixture() -> Lexicon {
    let mut lexicon = Lexicon::open_in_memory().unwrap();
    ingest(&mut lexicon, &fixture_document());
    lexicon
}

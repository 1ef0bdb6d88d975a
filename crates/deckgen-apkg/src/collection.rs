//! JSON metadata stored in the collection's `col` row.

use std::collections::BTreeMap;

use deckgen_config::{FIELD_NAMES, ModelConfig, ModelsConfig};
use serde::Serialize;
use serde_json::{Value, json};

/// Id of the deck every collection contains.
const DEFAULT_DECK_ID: i64 = 1;

/// Id of the default deck options group.
const DEFAULT_CONF_ID: i64 = 1;

const LATEX_PRE: &str = "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n";
const LATEX_POST: &str = "\\end{document}";

/// Model type stored in the model's `type` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModelKind {
    Standard,
    Cloze,
}

impl Serialize for ModelKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value: u8 = match self {
            ModelKind::Standard => 0,
            ModelKind::Cloze => 1,
        };
        serializer.serialize_u8(value)
    }
}

#[derive(Debug, Serialize)]
struct Model<'a> {
    id: i64,
    name: &'a str,
    #[serde(rename = "type")]
    kind: ModelKind,
    #[serde(rename = "mod")]
    modified: i64,
    usn: i64,
    sortf: u32,
    did: i64,
    tmpls: Vec<Template<'a>>,
    flds: Vec<Field>,
    css: &'a str,
    #[serde(rename = "latexPre")]
    latex_pre: &'static str,
    #[serde(rename = "latexPost")]
    latex_post: &'static str,
    latexsvg: bool,
    /// Fields required to generate each template: `[ord, "any", [field ords]]`.
    req: Vec<(u32, &'static str, Vec<u32>)>,
    tags: Vec<String>,
    vers: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Template<'a> {
    name: &'a str,
    ord: u32,
    qfmt: &'a str,
    afmt: &'a str,
    bqfmt: &'static str,
    bafmt: &'static str,
    did: Option<i64>,
}

#[derive(Debug, Serialize)]
struct Field {
    name: &'static str,
    ord: u32,
    font: &'static str,
    size: u32,
    sticky: bool,
    rtl: bool,
    media: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Deck<'a> {
    id: i64,
    name: &'a str,
    #[serde(rename = "mod")]
    modified: i64,
    usn: i64,
    collapsed: bool,
    desc: &'static str,
    #[serde(rename = "dyn")]
    dynamic: u8,
    conf: i64,
    extend_new: u32,
    extend_rev: u32,
    lrn_today: [i64; 2],
    new_today: [i64; 2],
    rev_today: [i64; 2],
    time_today: [i64; 2],
}

impl<'a> Deck<'a> {
    fn new(id: i64, name: &'a str, modified: i64) -> Self {
        Self {
            id,
            name,
            modified,
            usn: -1,
            collapsed: false,
            desc: "",
            dynamic: 0,
            conf: DEFAULT_CONF_ID,
            extend_new: 10,
            extend_rev: 50,
            lrn_today: [0, 0],
            new_today: [0, 0],
            rev_today: [0, 0],
            time_today: [0, 0],
        }
    }
}

/// Serialized JSON columns of the `col` row.
#[derive(Debug)]
pub(crate) struct CollectionMeta {
    pub conf: String,
    pub models: String,
    pub decks: String,
    pub dconf: String,
}

impl CollectionMeta {
    /// Metadata for a collection holding both note models and one deck.
    ///
    /// `modified` is in seconds since the epoch.
    pub fn new(
        models: &ModelsConfig,
        deck_id: i64,
        deck_name: &str,
        modified: i64,
    ) -> Result<Self, serde_json::Error> {
        let model_map: BTreeMap<String, Model<'_>> = [
            model(&models.basic, ModelKind::Standard, &models.css, deck_id, modified),
            model(&models.cloze, ModelKind::Cloze, &models.css, deck_id, modified),
        ]
        .into_iter()
        .map(|m| (m.id.to_string(), m))
        .collect();

        let deck_map: BTreeMap<String, Deck<'_>> = [
            Deck::new(DEFAULT_DECK_ID, "Default", modified),
            Deck::new(deck_id, deck_name, modified),
        ]
        .into_iter()
        .map(|d| (d.id.to_string(), d))
        .collect();

        Ok(Self {
            conf: serde_json::to_string(&conf(models.basic.id, deck_id))?,
            models: serde_json::to_string(&model_map)?,
            decks: serde_json::to_string(&deck_map)?,
            dconf: serde_json::to_string(&dconf())?,
        })
    }
}

fn model<'a>(
    config: &'a ModelConfig,
    kind: ModelKind,
    css: &'a str,
    deck_id: i64,
    modified: i64,
) -> Model<'a> {
    let flds = (0u32..)
        .zip(FIELD_NAMES)
        .map(|(ord, name)| Field {
            name,
            ord,
            font: "Arial",
            size: 20,
            sticky: false,
            rtl: false,
            media: Vec::new(),
        })
        .collect();

    Model {
        id: config.id,
        name: &config.name,
        kind,
        modified,
        usn: -1,
        sortf: 0,
        did: deck_id,
        tmpls: vec![Template {
            name: &config.template_name,
            ord: 0,
            qfmt: &config.front,
            afmt: &config.back,
            bqfmt: "",
            bafmt: "",
            did: None,
        }],
        flds,
        css,
        latex_pre: LATEX_PRE,
        latex_post: LATEX_POST,
        latexsvg: false,
        // Both fronts render the Question field.
        req: vec![(0, "any", vec![0])],
        tags: Vec::new(),
        vers: Vec::new(),
    }
}

fn conf(current_model: i64, current_deck: i64) -> Value {
    json!({
        "activeDecks": [current_deck],
        "addToCur": true,
        "collapseTime": 1200,
        "curDeck": current_deck,
        "curModel": current_model.to_string(),
        "dueCounts": true,
        "estTimes": true,
        "newBury": true,
        "newSpread": 0,
        "nextPos": 1,
        "sortBackwards": false,
        "sortType": "noteFld",
        "timeLim": 0
    })
}

fn dconf() -> Value {
    json!({
        "1": {
            "id": DEFAULT_CONF_ID,
            "name": "Default",
            "mod": 0,
            "usn": 0,
            "maxTaken": 60,
            "autoplay": true,
            "timer": 0,
            "replayq": true,
            "dyn": false,
            "new": {
                "bury": true,
                "delays": [1, 10],
                "initialFactor": 2500,
                "ints": [1, 4, 7],
                "order": 1,
                "perDay": 20,
                "separate": true
            },
            "lapse": {
                "delays": [10],
                "leechAction": 0,
                "leechFails": 8,
                "minInt": 1,
                "mult": 0
            },
            "rev": {
                "bury": true,
                "ease4": 1.3,
                "fuzz": 0.05,
                "ivlFct": 1,
                "maxIvl": 36500,
                "minSpace": 1,
                "perDay": 100
            }
        }
    })
}

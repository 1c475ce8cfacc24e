//! Technique catalog: the full IJF technique inventory
//!
//! Pure lookup table, no mutable state. Every recordable technique lives
//! here with its category; actions referencing a technique the catalog does
//! not know, or whose category belongs to the wrong family, are rejected.

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};

/// The two families of judo techniques
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Standing (throwing) techniques
    TachiWaza,
    /// Ground techniques: holds, chokes, joint locks
    NeWaza,
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Family::TachiWaza => write!(f, "tachi-waza"),
            Family::NeWaza => write!(f, "ne-waza"),
        }
    }
}

/// Technique categories, partitioned into the two families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    KataTeWaza,
    KoshiWaza,
    AshiWaza,
    MaSutemiWaza,
    YokoSutemiWaza,
    OsaekomiWaza,
    ShimeWaza,
    KansetsuWaza,
}

impl Category {
    pub fn family(&self) -> Family {
        match self {
            Category::KataTeWaza
            | Category::KoshiWaza
            | Category::AshiWaza
            | Category::MaSutemiWaza
            | Category::YokoSutemiWaza => Family::TachiWaza,
            Category::OsaekomiWaza | Category::ShimeWaza | Category::KansetsuWaza => {
                Family::NeWaza
            }
        }
    }

    /// Display label used on scoreboards and combination descriptions
    pub fn label(&self) -> &'static str {
        match self {
            Category::KataTeWaza => "Kata te waza",
            Category::KoshiWaza => "Koshi waza",
            Category::AshiWaza => "Ashi waza",
            Category::MaSutemiWaza => "Ma sutemi waza",
            Category::YokoSutemiWaza => "Yoko sutemi waza",
            Category::OsaekomiWaza => "Osaekomi waza",
            Category::ShimeWaza => "Shime waza",
            Category::KansetsuWaza => "Kansetsu waza",
        }
    }

    /// Short code used in combination labels, e.g. "K-A"
    pub fn code(&self) -> &'static str {
        match self {
            Category::KataTeWaza => "KTW",
            Category::KoshiWaza => "K",
            Category::AshiWaza => "A",
            Category::MaSutemiWaza => "MS",
            Category::YokoSutemiWaza => "YS",
            Category::OsaekomiWaza => "O",
            Category::ShimeWaza => "S",
            Category::KansetsuWaza => "KN",
        }
    }

    pub fn all() -> [Category; 8] {
        [
            Category::KataTeWaza,
            Category::KoshiWaza,
            Category::AshiWaza,
            Category::MaSutemiWaza,
            Category::YokoSutemiWaza,
            Category::OsaekomiWaza,
            Category::ShimeWaza,
            Category::KansetsuWaza,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Technique {
    pub id: &'static str,
    pub category: Category,
    pub display_name: &'static str,
}

impl Technique {
    const fn new(id: &'static str, category: Category, display_name: &'static str) -> Self {
        Self {
            id,
            category,
            display_name,
        }
    }

    pub fn family(&self) -> Family {
        self.category.family()
    }
}

/// The complete technique inventory
///
/// kani-basami and kawazu-gake are prohibited in competition but remain in
/// the catalog: the ledger must be able to record the attempt that earned
/// the penalty.
pub const TECHNIQUES: &[Technique] = &[
    // Kata-te-waza (hand techniques)
    Technique::new("seoi_nage", Category::KataTeWaza, "Seoi-nage"),
    Technique::new("ippon_seoi_nage", Category::KataTeWaza, "Ippon-seoi-nage"),
    Technique::new("seoi_otoshi", Category::KataTeWaza, "Seoi-otoshi"),
    Technique::new("tai_otoshi", Category::KataTeWaza, "Tai-otoshi"),
    Technique::new("kata_guruma", Category::KataTeWaza, "Kata-guruma"),
    Technique::new("sukui_nage", Category::KataTeWaza, "Sukui-nage"),
    Technique::new("obi_otoshi", Category::KataTeWaza, "Obi-otoshi"),
    Technique::new("uki_otoshi", Category::KataTeWaza, "Uki-otoshi"),
    Technique::new("sumi_otoshi", Category::KataTeWaza, "Sumi-otoshi"),
    Technique::new("yama_arashi", Category::KataTeWaza, "Yama-arashi"),
    Technique::new("obi_tori_gaeshi", Category::KataTeWaza, "Obi-tori-gaeshi"),
    Technique::new("morote_gari", Category::KataTeWaza, "Morote-gari"),
    Technique::new("kuchiki_taoshi", Category::KataTeWaza, "Kuchiki-taoshi"),
    Technique::new("kibisu_gaeshi", Category::KataTeWaza, "Kibisu-gaeshi"),
    Technique::new("uchi_mata_sukashi", Category::KataTeWaza, "Uchi-mata-sukashi"),
    Technique::new("ko_uchi_gaeshi", Category::KataTeWaza, "Ko-uchi-gaeshi"),
    // Koshi-waza (hip techniques)
    Technique::new("uki_goshi", Category::KoshiWaza, "Uki-goshi"),
    Technique::new("o_goshi", Category::KoshiWaza, "O-goshi"),
    Technique::new("koshi_guruma", Category::KoshiWaza, "Koshi-guruma"),
    Technique::new("tsurikomi_goshi", Category::KoshiWaza, "Tsurikomi-goshi"),
    Technique::new(
        "sode_tsurikomi_goshi",
        Category::KoshiWaza,
        "Sode-tsurikomi-goshi",
    ),
    Technique::new("harai_goshi", Category::KoshiWaza, "Harai-goshi"),
    Technique::new("tsuri_goshi", Category::KoshiWaza, "Tsuri-goshi"),
    Technique::new("hane_goshi", Category::KoshiWaza, "Hane-goshi"),
    Technique::new("utsuri_goshi", Category::KoshiWaza, "Utsuri-goshi"),
    Technique::new("ushiro_goshi", Category::KoshiWaza, "Ushiro-goshi"),
    // Ashi-waza (foot and leg techniques)
    Technique::new("ashi_guruma", Category::AshiWaza, "Ashi-guruma"),
    Technique::new("de_ashi_harai", Category::AshiWaza, "De-ashi-harai"),
    Technique::new(
        "harai_tsurikomi_ashi",
        Category::AshiWaza,
        "Harai-tsurikomi-ashi",
    ),
    Technique::new("hiza_guruma", Category::AshiWaza, "Hiza-guruma"),
    Technique::new("kosoto_gake", Category::AshiWaza, "Kosoto-gake"),
    Technique::new("kosoto_gari", Category::AshiWaza, "Kosoto-gari"),
    Technique::new("kouchi_gari", Category::AshiWaza, "Kouchi-gari"),
    Technique::new("o_guruma", Category::AshiWaza, "O-guruma"),
    Technique::new("okuri_ashi_harai", Category::AshiWaza, "Okuri-ashi-harai"),
    Technique::new("osoto_gari", Category::AshiWaza, "Osoto-gari"),
    Technique::new("osoto_guruma", Category::AshiWaza, "Osoto-guruma"),
    Technique::new("osoto_otoshi", Category::AshiWaza, "Osoto-otoshi"),
    Technique::new("ouchi_gari", Category::AshiWaza, "Ouchi-gari"),
    Technique::new(
        "sasae_tsurikomi_ashi",
        Category::AshiWaza,
        "Sasae-tsurikomi-ashi",
    ),
    Technique::new("uchi_mata", Category::AshiWaza, "Uchi-mata"),
    Technique::new("osoto_gaeshi", Category::AshiWaza, "Osoto-gaeshi"),
    Technique::new("ouchi_gaeshi", Category::AshiWaza, "Ouchi-gaeshi"),
    Technique::new("hane_goshi_gaeshi", Category::AshiWaza, "Hane-goshi-gaeshi"),
    Technique::new(
        "harai_goshi_gaeshi",
        Category::AshiWaza,
        "Harai-goshi-gaeshi",
    ),
    Technique::new("uchi_mata_gaeshi", Category::AshiWaza, "Uchi-mata-gaeshi"),
    Technique::new("tsubame_gaeshi", Category::AshiWaza, "Tsubame-gaeshi"),
    // Ma-sutemi-waza (rear sacrifice techniques)
    Technique::new("hikikomi_gaeshi", Category::MaSutemiWaza, "Hikikomi-gaeshi"),
    Technique::new("sumi_gaeshi", Category::MaSutemiWaza, "Sumi-gaeshi"),
    Technique::new("tawara_gaeshi", Category::MaSutemiWaza, "Tawara-gaeshi"),
    Technique::new("tomoe_nage", Category::MaSutemiWaza, "Tomoe-nage"),
    Technique::new("ura_nage", Category::MaSutemiWaza, "Ura-nage"),
    // Yoko-sutemi-waza (side sacrifice techniques)
    Technique::new("daki_wakare", Category::YokoSutemiWaza, "Daki-wakare"),
    Technique::new("hane_makikomi", Category::YokoSutemiWaza, "Hane-makikomi"),
    Technique::new("harai_makikomi", Category::YokoSutemiWaza, "Harai-makikomi"),
    Technique::new("osoto_makikomi", Category::YokoSutemiWaza, "Osoto-makikomi"),
    Technique::new("soto_makikomi", Category::YokoSutemiWaza, "Soto-makikomi"),
    Technique::new("tani_otoshi", Category::YokoSutemiWaza, "Tani-otoshi"),
    Technique::new("uchi_makikomi", Category::YokoSutemiWaza, "Uchi-makikomi"),
    Technique::new(
        "uchi_mata_makikomi",
        Category::YokoSutemiWaza,
        "Uchi-mata-makikomi",
    ),
    Technique::new("uki_waza", Category::YokoSutemiWaza, "Uki-waza"),
    Technique::new("yoko_gake", Category::YokoSutemiWaza, "Yoko-gake"),
    Technique::new("yoko_guruma", Category::YokoSutemiWaza, "Yoko-guruma"),
    Technique::new("yoko_otoshi", Category::YokoSutemiWaza, "Yoko-otoshi"),
    Technique::new("yoko_wakare", Category::YokoSutemiWaza, "Yoko-wakare"),
    Technique::new(
        "ko_uchi_makikomi",
        Category::YokoSutemiWaza,
        "Ko-uchi-makikomi",
    ),
    Technique::new("kani_basami", Category::YokoSutemiWaza, "Kani-basami"),
    Technique::new("kawazu_gake", Category::YokoSutemiWaza, "Kawazu-gake"),
    // Osaekomi-waza (holds); scored by hold duration
    Technique::new("kesa_gatame", Category::OsaekomiWaza, "Kesa-gatame"),
    Technique::new("kata_gatame", Category::OsaekomiWaza, "Kata-gatame"),
    Technique::new(
        "kami_shiho_gatame",
        Category::OsaekomiWaza,
        "Kami-shiho-gatame",
    ),
    Technique::new(
        "kuzure_kami_shiho_gatame",
        Category::OsaekomiWaza,
        "Kuzure-kami-shiho-gatame",
    ),
    Technique::new(
        "yoko_shiho_gatame",
        Category::OsaekomiWaza,
        "Yoko-shiho-gatame",
    ),
    Technique::new(
        "tate_shiho_gatame",
        Category::OsaekomiWaza,
        "Tate-shiho-gatame",
    ),
    Technique::new(
        "kuzure_kesa_gatame",
        Category::OsaekomiWaza,
        "Kuzure-kesa-gatame",
    ),
    Technique::new("uki_gatame", Category::OsaekomiWaza, "Uki-gatame"),
    Technique::new("ura_gatame", Category::OsaekomiWaza, "Ura-gatame"),
    Technique::new(
        "ushiro_kesa_gatame",
        Category::OsaekomiWaza,
        "Ushiro-kesa-gatame",
    ),
    // Shime-waza (chokes); effective means ippon
    Technique::new("nami_juji_jime", Category::ShimeWaza, "Nami-juji-jime"),
    Technique::new("gyaku_juji_jime", Category::ShimeWaza, "Gyaku-juji-jime"),
    Technique::new("kata_juji_jime", Category::ShimeWaza, "Kata-juji-jime"),
    Technique::new("hadaka_jime", Category::ShimeWaza, "Hadaka-jime"),
    Technique::new("okuri_eri_jime", Category::ShimeWaza, "Okuri-eri-jime"),
    Technique::new("kataha_jime", Category::ShimeWaza, "Kataha-jime"),
    Technique::new("do_jime", Category::ShimeWaza, "Do-jime"),
    Technique::new("sode_guruma_jime", Category::ShimeWaza, "Sode-guruma-jime"),
    Technique::new("kata_te_jime", Category::ShimeWaza, "Kata-te-jime"),
    Technique::new("ryo_te_jime", Category::ShimeWaza, "Ryo-te-jime"),
    Technique::new("tsukkomi_jime", Category::ShimeWaza, "Tsukkomi-jime"),
    Technique::new("sankaku_jime", Category::ShimeWaza, "Sankaku-jime"),
    // Kansetsu-waza (joint locks); effective means ippon
    Technique::new("ude_garami", Category::KansetsuWaza, "Ude-garami"),
    Technique::new(
        "ude_hishigi_juji_gatame",
        Category::KansetsuWaza,
        "Ude-hishigi-juji-gatame",
    ),
    Technique::new(
        "ude_hishigi_ude_gatame",
        Category::KansetsuWaza,
        "Ude-hishigi-ude-gatame",
    ),
    Technique::new(
        "ude_hishigi_hiza_gatame",
        Category::KansetsuWaza,
        "Ude-hishigi-hiza-gatame",
    ),
    Technique::new(
        "ude_hishigi_waki_gatame",
        Category::KansetsuWaza,
        "Ude-hishigi-waki-gatame",
    ),
    Technique::new(
        "ude_hishigi_hara_gatame",
        Category::KansetsuWaza,
        "Ude-hishigi-hara-gatame",
    ),
    Technique::new(
        "ude_hishigi_ashi_gatame",
        Category::KansetsuWaza,
        "Ude-hishigi-ashi-gatame",
    ),
    Technique::new(
        "ude_hishigi_te_gatame",
        Category::KansetsuWaza,
        "Ude-hishigi-te-gatame",
    ),
    Technique::new(
        "ude_hishigi_sankaku_gatame",
        Category::KansetsuWaza,
        "Ude-hishigi-sankaku-gatame",
    ),
    Technique::new("ashi_garami", Category::KansetsuWaza, "Ashi-garami"),
];

/// Look up a technique by id
pub fn find(id: &str) -> Option<&'static Technique> {
    TECHNIQUES.iter().find(|t| t.id == id)
}

/// All techniques in a category, in catalog order
pub fn techniques_for(category: Category) -> impl Iterator<Item = &'static Technique> {
    TECHNIQUES.iter().filter(move |t| t.category == category)
}

/// Category of a technique id, if the catalog knows it
pub fn category_of(id: &str) -> Option<Category> {
    find(id).map(|t| t.category)
}

/// Validate a technique id against the family an action declared
pub fn validate(id: &str, family: Family) -> Result<&'static Technique> {
    let technique = find(id).ok_or_else(|| EngineError::InvalidTechnique(id.to_string()))?;
    if technique.family() != family {
        return Err(EngineError::InvalidTechnique(format!(
            "{} is {}, not {}",
            id,
            technique.family(),
            family
        )));
    }
    Ok(technique)
}

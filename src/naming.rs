//! Identifier derivation: camel-casing, English singularization, prefixing.
//!
//! All functions are pure. Class names are `prefix + Capitalized(camel(key))`,
//! field names are plain `camel(key)` and never prefixed.
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// ------------------------------ Case -------------------------------------- //

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-_ ]([a-z])").expect("camel boundary regex"));

/// Drop each `-`, `_` or space that precedes a lowercase letter and upper-case
/// that letter. Everything else, including a leading capital, is untouched.
pub fn to_camel(s: &str) -> String {
    CAMEL_BOUNDARY
        .replace_all(s, |caps: &Captures| caps[1].to_ascii_uppercase())
        .into_owned()
}

pub fn add_prefix(s: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + s.len());
    out.push_str(prefix);
    let mut chars = s.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
    out
}

pub fn to_class_name(s: &str, prefix: &str) -> String {
    add_prefix(&to_camel(s), prefix)
}

pub fn to_ivar_name(s: &str) -> String {
    to_camel(s)
}

/// Name of the generated `EFMapper` subclass. Reserved: no model class may
/// take it, its files would replace the registrar's.
pub fn registrar_name(prefix: &str) -> String {
    format!("{prefix}Mapper")
}

// --------------------------- Singularization ------------------------------ //

const UNCOUNTABLE_WORDS: &[&str] = &[
    "advice", "aircraft", "analytics", "audio", "bison", "cash", "chassis",
    "corps", "data", "debris", "equipment", "feedback", "firmware", "gallows",
    "hardware", "headquarters", "information", "jeans", "kudos", "luggage",
    "mail", "media", "metadata", "moose", "music", "news", "personnel",
    "police", "premises", "research", "rice", "salmon", "scissors", "series",
    "sheep", "software", "species", "staff", "swine", "traffic", "trout",
    "tuna", "wildlife",
];

static UNCOUNTABLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?i)pok[eé]mon$", r"(?i)[^aeiou]ese$", r"(?i)deer$", r"(?i)fish$", r"(?i)measles$", r"(?i)o[iu]s$", r"(?i)pox$"]
        .into_iter()
        .map(|p| Regex::new(p).expect("uncountable regex"))
        .collect()
});

/// plural → singular, matched on the whole (lower-cased) word.
const IRREGULAR: &[(&str, &str)] = &[
    ("anathemata", "anathema"),
    ("canvases", "canvas"),
    ("dice", "die"),
    ("dingoes", "dingo"),
    ("dogmata", "dogma"),
    ("echoes", "echo"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("genera", "genus"),
    ("groves", "grove"),
    ("lemmata", "lemma"),
    ("loaves", "loaf"),
    ("oxen", "ox"),
    ("passersby", "passerby"),
    ("pickaxes", "pickaxe"),
    ("quizzes", "quiz"),
    ("schemata", "schema"),
    ("stigmata", "stigma"),
    ("teeth", "tooth"),
    ("thieves", "thief"),
    ("tornadoes", "tornado"),
    ("torpedoes", "torpedo"),
    ("valves", "valve"),
    ("volcanoes", "volcano"),
];

/// Suffix rules, first match wins.
static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)men$", "man"),
        (r"(?i)(eau)x?$", "${1}"),
        (r"(?i)(child)ren$", "${1}"),
        (r"(?i)(pe)(?:rson|ople)$", "${1}rson"),
        (r"(?i)(matr|append)ices$", "${1}ix"),
        (r"(?i)(cod|mur|sil|vert|ind)ices$", "${1}ex"),
        (r"(?i)(alumn|alg|vertebr)(?:a|ae)$", "${1}a"),
        (r"(?i)(apheli|hyperbat|periheli|asyndet|noumen|phenomen|criteri|organ|prolegomen|hedr|automat)a$", "${1}on"),
        (r"(?i)(agend|addend|millenni|extrem|bacteri|desiderat|strat|candelabr|errat|ov|symposi|curricul|quor)a$", "${1}um"),
        (r"(?i)(alumn|syllab|vir|radi|nucle|fung|cact|stimul|termin|bacill|foc|uter|loc|strat)(?:us|i)$", "${1}us"),
        (r"(?i)(test)(?:is|es)$", "${1}is"),
        (r"(?i)(movie|twelve|abuse|e[mn]u)s$", "${1}"),
        (r"(?i)(analy|diagno|parenthe|progno|synop|the|empha|cri|ne)(?:sis|ses)$", "${1}sis"),
        (r"(?i)(x|ch|ss|sh|zz|tto|go|cho|alias|[^aou]us|t[lm]as|gas|(?:her|at|gr)o|[aeiou]ris)(?:es)?$", "${1}"),
        (r"(?i)(seraph|cherub)im$", "${1}"),
        (r"(?i)\b((?:tit)?m|l)ice$", "${1}ouse"),
        (r"(?i)\b(mon|smil)ies$", "${1}ey"),
        (r"(?i)\b(l|(?:neck|cross|hog|aun)?t|coll|faer|food|gen|goon|group|hipp|junk|vegg|(?:pork)?p|charl|calor|cut)ies$", "${1}ie"),
        (r"(?i)(dg|ss|ois|lk|ok|wn|mb|th|ch|ec|oal|is|ck|ix|sser|ts|wb)ies$", "${1}ie"),
        (r"(?i)ies$", "y"),
        (r"(?i)(ar|(?:wo|[ae])l|[eo][ao])ves$", "${1}f"),
        (r"(?i)(wi|kni|(?:after|half|high|low|mid|non|night|[^\w]|^)li)ves$", "${1}fe"),
        (r"(?i)(ss)$", "${1}"),
        (r"(?i)s$", ""),
    ]
    .into_iter()
    .map(|(p, r)| (Regex::new(p).expect("singular rule regex"), r))
    .collect()
});

/// Singular form of the trailing word of `s` (`user_items` → `user_item`,
/// `teamMembers` → `teamMember`). Unrecognised forms come back unchanged.
pub fn singularize(s: &str) -> String {
    let (head, word) = split_last_word(s);
    format!("{head}{}", singularize_word(word))
}

fn singularize_word(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_lowercase();
    if UNCOUNTABLE_WORDS.contains(&lower.as_str())
        || UNCOUNTABLE_PATTERNS.iter().any(|re| re.is_match(word))
    {
        return word.to_string();
    }
    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return restore_case(word, singular);
    }
    if IRREGULAR.iter().any(|(_, singular)| *singular == lower) {
        return word.to_string();
    }
    for (re, replacement) in RULES.iter() {
        if re.is_match(word) {
            let out = re.replace(word, *replacement).into_owned();
            return if is_all_upper(word) { out.to_uppercase() } else { out };
        }
    }
    word.to_string()
}

/// Split before the last word: after the last separator, or at the last
/// lower → upper transition of a camel-cased identifier. Runs of capitals
/// (`URLs`, `PEOPLE`) stay one word.
fn split_last_word(s: &str) -> (&str, &str) {
    for (i, c) in s.char_indices().rev() {
        if matches!(c, '-' | '_' | ' ') {
            return s.split_at(i + c.len_utf8());
        }
        if c.is_uppercase() {
            match s[..i].chars().next_back() {
                Some(prev) if !prev.is_uppercase() && !matches!(prev, '-' | '_' | ' ') => {
                    return s.split_at(i);
                }
                _ => {}
            }
        }
    }
    ("", s)
}

fn is_all_upper(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

fn restore_case(original: &str, replacement: &str) -> String {
    if is_all_upper(original) {
        return replacement.to_uppercase();
    }
    match original.chars().next() {
        Some(first) if first.is_uppercase() => add_prefix(replacement, ""),
        _ => replacement.to_string(),
    }
}

// ------------------------------- Tests ------------------------------------ //

//! Static vocabulary tables for attribute inference.
//!
//! Tables are ordered slices rather than maps: partial matching is
//! first-match-wins, so iteration order is part of the behaviour.
//! Reordering [`CATEGORY_VOCABULARY`] changes which label a compound tag
//! such as "american science fiction" receives.

use crate::model::Mood;

/// Category used when no tag matches the vocabulary.
pub const DEFAULT_CATEGORY: &str = "ficción";

/// Raw genre token -> canonical category label.
pub const CATEGORY_VOCABULARY: &[(&str, &str)] = &[
    ("fiction", "ficción"),
    ("ficción", "ficción"),
    ("novel", "ficción"),
    ("novela", "ficción"),
    ("literary fiction", "ficción"),
    ("ficción literaria", "ficción"),
    ("historical fiction", "histórico"),
    ("ficción histórica", "histórico"),
    ("historical", "histórico"),
    ("historia", "historia"),
    ("history", "historia"),
    ("mystery", "intriga"),
    ("misterio", "intriga"),
    ("thriller", "intriga"),
    ("suspense", "intriga"),
    ("crime", "policial"),
    ("crimen", "policial"),
    ("detective", "policial"),
    ("noir", "noir"),
    ("fantasy", "fantasía"),
    ("fantasía", "fantasía"),
    ("science fiction", "ciencia ficción"),
    ("ciencia ficción", "ciencia ficción"),
    ("sci-fi", "ciencia ficción"),
    ("romance", "romántico"),
    ("romántico", "romántico"),
    ("humor", "humor"),
    ("comedy", "humor"),
    ("comedia", "humor"),
    ("horror", "oscuro"),
    ("terror", "oscuro"),
    ("drama", "dramático"),
    ("dramático", "dramático"),
    ("biography", "memorias"),
    ("biografía", "memorias"),
    ("memoir", "memorias"),
    ("memorias", "memorias"),
    ("autobiography", "memorias"),
    ("essay", "ensayo"),
    ("ensayo", "ensayo"),
    ("essays", "ensayo"),
    ("philosophy", "filosófico"),
    ("filosofía", "filosófico"),
    ("psychology", "psicológico"),
    ("psicología", "psicológico"),
    ("short stories", "relatos cortos"),
    ("relatos", "relatos cortos"),
    ("cuentos", "relatos cortos"),
    ("poetry", "poesía"),
    ("poesía", "poesía"),
    ("adventure", "aventura"),
    ("aventura", "aventura"),
    ("war", "histórico"),
    ("guerra", "histórico"),
    ("young adult", "juvenil"),
    ("juvenil", "juvenil"),
    ("children", "infantil"),
    ("infantil", "infantil"),
    ("classic", "ficción"),
    ("clásico", "ficción"),
    ("satire", "satírico"),
    ("sátira", "satírico"),
    ("gothic", "oscuro"),
    ("gótico", "oscuro"),
    ("erotic", "erótico"),
    ("erótico", "erótico"),
    ("chronicle", "crónica"),
    ("crónica", "crónica"),
    ("journalism", "crónica"),
    ("periodismo", "crónica"),
    ("art", "arte"),
    ("arte", "arte"),
    ("science", "ciencias"),
    ("ciencia", "ciencias"),
    ("social science", "ciencias sociales"),
    ("ciencias sociales", "ciencias sociales"),
    ("self-help", "divulgación"),
    ("autoayuda", "divulgación"),
    ("non-fiction", "ensayo"),
    ("no ficción", "ensayo"),
];

/// Authors whose books read as dense regardless of length.
pub const DENSE_AUTHORS: &[&str] = &[
    "proust", "joyce", "pynchon", "gaddis", "delillo", "wallace", "faulkner", "musil",
    "bernhard", "bolaño", "mann", "dostoievski", "dostoyevsky", "tolstoy", "tolstói",
    "melville", "cervantes", "james", "woolf", "nabokov", "beckett", "kafka",
];

/// Authors whose shorter books read as light.
pub const LIGHT_AUTHORS: &[&str] = &[
    "agatha christie", "christie", "king", "stephen king", "grisham", "coelho",
    "paulo coelho", "follett", "ken follett", "brown", "dan brown", "rowling", "pratchett",
    "dahl", "roald dahl",
];

/// Page count under which a light author's book stays light.
pub const LIGHT_AUTHOR_PAGE_LIMIT: u32 = 400;

/// Tags marking books for younger readers (exact, case-insensitive).
pub const JUVENILE_MARKERS: &[&str] = &["juvenil", "infantil"];

/// Tag fragments that push a mid-length book to dense.
pub const DENSE_GENRE_MARKERS: &[&str] = &["filosófico", "filosofía", "ensayo", "history", "historia"];

/// Mood -> keywords, scored by substring hits. Ties go to the earlier mood.
pub const MOOD_KEYWORDS: &[(Mood, &[&str])] = &[
    (Mood::Tense, &["thriller", "suspense", "misterio", "crimen", "asesino", "muerte"]),
    (Mood::Emotional, &["amor", "familia", "pérdida", "drama", "corazón", "lágrimas"]),
    (Mood::Reflective, &["filosofía", "ensayo", "reflexión", "vida", "existencia"]),
    (Mood::Immersive, &["mundo", "épico", "saga", "universo", "aventura"]),
    (Mood::Lighthearted, &["humor", "comedia", "divertido", "risa"]),
    (Mood::Dark, &["horror", "terror", "gótico", "oscuro", "siniestro"]),
    (Mood::Intimate, &["memorias", "autobiografía", "personal", "confesión"]),
    (Mood::Imaginative, &["fantasía", "magia", "dragón", "hechizo"]),
    (Mood::Speculative, &["ciencia ficción", "futuro", "distopía", "tecnología"]),
    (Mood::Unsettling, &["psicológico", "perturbador", "mente", "locura"]),
    (Mood::Entertaining, &["aventura", "acción", "emocionante"]),
];

/// Categories that make a book fast-paced.
pub const FAST_CATEGORIES: &[&str] = &["intriga", "aventura", "policial", "acción"];

/// Categories that make a book slow-paced.
pub const SLOW_CATEGORIES: &[&str] = &["filosófico", "ensayo", "poesía", "reflexivo"];

/// Award label -> keywords searched in tags, title and authors.
pub const AWARD_KEYWORDS: &[(&str, &[&str])] = &[
    ("Nobel de Literatura", &["nobel", "premio nobel"]),
    ("Pulitzer", &["pulitzer"]),
    ("Booker Prize", &["booker", "man booker"]),
    (
        "Premio hispano importante",
        &[
            "premio planeta",
            "premio nadal",
            "premio alfaguara",
            "premio cervantes",
            "premio herralde",
            "premio biblioteca breve",
        ],
    ),
    ("Prix Goncourt", &["goncourt"]),
    ("Hugo Award", &["hugo award", "premio hugo"]),
    ("Nebula Award", &["nebula"]),
];

/// Category -> fallback blurb when the synopsis has nothing usable.
pub const BLURB_TEMPLATES: &[(&str, &str)] = &[
    ("histórico", "Una inmersión en el pasado que ilumina el presente."),
    ("intriga", "Un misterio que no podrás soltar hasta la última página."),
    ("fantasía", "Un mundo imaginario que cobra vida con cada página."),
    ("ciencia ficción", "Una visión del futuro que cuestiona el presente."),
    ("romántico", "Una historia de amor que toca el corazón."),
    ("filosófico", "Una reflexión profunda sobre la existencia."),
];

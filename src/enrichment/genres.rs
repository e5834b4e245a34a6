//! English to Spanish genre labels for provider subjects.

/// Subject (lowercase) to Spanish tag, checked exactly and then by
/// containment in table order.
pub const GENRE_MAPPING: &[(&str, &str)] = &[
    ("fiction", "Ficción"),
    ("literary fiction", "Ficción literaria"),
    ("novels", "Novela"),
    ("novel", "Novela"),
    ("mystery", "Misterio"),
    ("thriller", "Thriller"),
    ("suspense", "Suspense"),
    ("crime", "Crimen"),
    ("detective", "Policial"),
    ("noir", "Noir"),
    ("crime fiction", "Policial"),
    ("science fiction", "Ciencia ficción"),
    ("sci-fi", "Ciencia ficción"),
    ("fantasy", "Fantasía"),
    ("epic fantasy", "Fantasía épica"),
    ("urban fantasy", "Fantasía urbana"),
    ("horror", "Terror"),
    ("gothic", "Gótico"),
    ("supernatural", "Sobrenatural"),
    ("romance", "Romance"),
    ("romantic fiction", "Romance"),
    ("drama", "Drama"),
    ("family", "Familia"),
    ("historical fiction", "Ficción histórica"),
    ("historical", "Histórico"),
    ("history", "Historia"),
    ("war", "Guerra"),
    ("world war", "Guerra Mundial"),
    ("military", "Militar"),
    ("biography", "Biografía"),
    ("autobiography", "Autobiografía"),
    ("memoir", "Memorias"),
    ("memoirs", "Memorias"),
    ("biography & autobiography", "Biografía"),
    ("non-fiction", "No ficción"),
    ("nonfiction", "No ficción"),
    ("essays", "Ensayo"),
    ("essay", "Ensayo"),
    ("philosophy", "Filosofía"),
    ("psychology", "Psicología"),
    ("science", "Ciencia"),
    ("social science", "Ciencias sociales"),
    ("politics", "Política"),
    ("economics", "Economía"),
    ("poetry", "Poesía"),
    ("art", "Arte"),
    ("music", "Música"),
    ("literary criticism", "Crítica literaria"),
    ("literature", "Literatura"),
    ("short stories", "Relatos cortos"),
    ("young adult", "Juvenil"),
    ("children", "Infantil"),
    ("children's", "Infantil"),
    ("adventure", "Aventura"),
    ("humor", "Humor"),
    ("satire", "Sátira"),
    ("comedy", "Comedia"),
    ("classics", "Clásico"),
    ("classic literature", "Clásico"),
    ("travel", "Viajes"),
    ("self-help", "Autoayuda"),
    ("cooking", "Cocina"),
    ("sports", "Deportes"),
    ("ficción", "Ficción"),
    ("novela", "Novela"),
    ("misterio", "Misterio"),
    ("fantasía", "Fantasía"),
    ("terror", "Terror"),
    ("histórico", "Histórico"),
    ("biografía", "Biografía"),
    ("ensayo", "Ensayo"),
    ("poesía", "Poesía"),
];

/// Library-catalogue noise that says nothing about the book.
pub const IGNORE_GENRES: &[&str] = &[
    "accessible book",
    "protected daisy",
    "in library",
    "lending library",
    "overdrive",
    "large type books",
    "fiction, general",
    "general",
    "literary collections",
    "audiobook",
];

/// Whether a subject is catalogue noise.
pub fn is_ignored(subject: &str) -> bool {
    IGNORE_GENRES.contains(&subject.trim().to_lowercase().as_str())
}

/// Translate a provider subject to a Spanish tag.
///
/// Unknown subjects are returned title-cased.
pub fn translate_genre(genre: &str) -> String {
    let key = genre.trim().to_lowercase();
    if key.is_empty() {
        return String::new();
    }

    if let Some((_, label)) = GENRE_MAPPING.iter().find(|(k, _)| *k == key) {
        return label.to_string();
    }

    if let Some((_, label)) = GENRE_MAPPING
        .iter()
        .find(|(k, _)| key.contains(k) || k.contains(key.as_str()))
    {
        return label.to_string();
    }

    title_case(genre.trim())
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

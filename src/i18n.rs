use crate::types::Language;
use once_cell::sync::Lazy;
use std::collections::HashMap;

const EN: &[(&str, &str)] = &[
    ("dashboard", "Dashboard"),
    ("courses", "Courses"),
    ("assignments", "Assignments"),
    ("messages", "Messages"),
    ("calendar", "Calendar"),
    ("profile", "Profile"),
    ("logout", "Logout"),
    ("welcome", "Welcome"),
    ("create_course", "Create Course"),
    ("join_course", "Join Course"),
    ("practice_quiz", "Practice Quiz"),
    ("notifications", "Notifications"),
    ("students", "Students"),
    ("teachers", "Teachers"),
    ("admin", "Admin"),
];

const TA: &[(&str, &str)] = &[
    ("dashboard", "டாஷ்போர்டு"),
    ("courses", "பாடங்கள்"),
    ("assignments", "பணிகள்"),
    ("messages", "செய்திகள்"),
    ("calendar", "நாட்காட்டி"),
    ("profile", "சுயவிவரம்"),
    ("logout", "வெளியேறு"),
    ("welcome", "வரவேற்கிறோம்"),
    ("create_course", "பாடம் உருவாக்கு"),
    ("join_course", "பாடத்தில் சேர்"),
    ("practice_quiz", "பயிற்சி வினாடி வினா"),
    ("notifications", "அறிவிப்புகள்"),
    ("students", "மாணவர்கள்"),
    ("teachers", "ஆசிரியர்கள்"),
    ("admin", "நிர்வாகி"),
];

const HI: &[(&str, &str)] = &[
    ("dashboard", "डैशबोर्ड"),
    ("courses", "पाठ्यक्रम"),
    ("assignments", "असाइनमेंट"),
    ("messages", "संदेश"),
    ("calendar", "कैलेंडर"),
    ("profile", "प्रोफ़ाइल"),
    ("logout", "लॉगआउट"),
    ("welcome", "स्वागत है"),
    ("create_course", "कोर्स बनाएं"),
    ("join_course", "कोर्स में शामिल हों"),
    ("practice_quiz", "अभ्यास प्रश्नोत्तरी"),
    ("notifications", "सूचनाएं"),
    ("students", "छात्र"),
    ("teachers", "शिक्षक"),
    ("admin", "व्यवस्थापक"),
];

static BUILTIN: Lazy<Dictionary> = Lazy::new(|| {
    let mut dictionary = Dictionary::default();
    for (lang, entries) in [(Language::En, EN), (Language::Ta, TA), (Language::Hi, HI)] {
        dictionary.extend(lang, entries.iter().copied());
    }
    dictionary
});

/// Per-language key lookup. Missing keys are simply absent; callers keep
/// whatever text they already show.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dictionary {
    tables: HashMap<Language, HashMap<String, String>>,
}

impl Dictionary {
    pub fn builtin() -> &'static Dictionary {
        &BUILTIN
    }

    pub fn extend<'a>(
        &mut self,
        lang: Language,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        let table = self.tables.entry(lang).or_default();
        for (key, text) in entries {
            table.insert(key.to_string(), text.to_string());
        }
    }

    pub fn lookup(&self, lang: Language, key: &str) -> Option<&str> {
        self.tables.get(&lang)?.get(key).map(String::as_str)
    }

    /// Lookup with the key itself as the last resort, for labels that must
    /// render something.
    pub fn label<'a>(&'a self, lang: Language, key: &'a str) -> &'a str {
        self.lookup(lang, key)
            .or_else(|| self.lookup(Language::En, key))
            .unwrap_or(key)
    }
}

//! Arabic presentation helpers
//!
//! Numerals, counts, narrator name cleanup, grade and collection names, and the fixed
//! interface strings used by the web pages.

use std::sync::LazyLock;
use regex::Regex;

const EASTERN_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Interface strings
pub mod ui_text {
    pub const BACK_TO_ALL_HADITHS: &str = "الرجوع إلى جميع الأحاديث";
    pub const BROWSE_CHAPTERS: &str = "تصفح الفصول";
    pub const READ_FULL_HADITH: &str = "اقرأ الحديث كاملاً";
    pub const BROWSE: &str = "تصفح";

    pub const HADITHS: &str = "أحاديث";
    pub const HADITH: &str = "حديث";
    pub const NARRATORS: &str = "رواة";
    pub const NARRATOR: &str = "راوي";
    pub const CHAPTERS: &str = "فصول";
    pub const CHAPTER: &str = "فصل";
    pub const RESULTS: &str = "النتائج";
    pub const RESULTS_COUNT: &str = "عدد النتائج";

    pub const SEARCHING: &str = "جاري البحث...";
    pub const LOADING: &str = "جاري التحميل...";
    pub const NO_RESULTS: &str = "لا توجد نتائج";
    pub const TRY_DIFFERENT_SEARCH: &str = "جرب تعديل معايير البحث";
    pub const SEARCH: &str = "بحث";

    pub const BOOK_LABEL: &str = "الكتاب";
    pub const CHAPTER_LABEL: &str = "الباب";
    pub const ALL_CHAPTERS: &str = "كل الأبواب";
    pub const HADITH_TEXT_LABEL: &str = "نص الحديث";
    pub const SEARCH_IN_TEXT: &str = "ابحث في نص الحديث...";
    pub const NARRATOR_LABEL: &str = "الراوي";
    pub const NARRATOR_NAME: &str = "اسم الراوي...";

    pub const CHAPTER_NUMBER: &str = "الفصل";
    pub const UNKNOWN_NARRATOR: &str = "راوي غير معروف";

    pub const ISNAD: &str = "الإسناد";
    pub const SANAD: &str = "السند";
    pub const EXPLANATION: &str = "الشرح";
    pub const GRADE: &str = "الدرجة";
    pub const TEACHERS: &str = "الشيوخ";
    pub const STUDENTS: &str = "التلاميذ";
    pub const BIRTH: &str = "الولادة";
    pub const DEATH: &str = "الوفاة";
    pub const DEATH_PLACE: &str = "مكان الوفاة";

    pub const ERROR_TITLE: &str = "حدث خطأ";
    pub const ERROR_DESCRIPTION: &str = "تعذر عرض هذه الصفحة.";
    pub const TRY_AGAIN: &str = "حاول مرة أخرى";
}

/// Title and description shown on a not-found page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFoundMessage {
    pub title: &'static str,
    pub description: &'static str,
}

pub const CHAPTER_NOT_FOUND: NotFoundMessage = NotFoundMessage {
    title: "الفصل غير موجود",
    description: "لم يتم العثور على الفصل المطلوب.",
};

pub const SOURCE_NOT_FOUND: NotFoundMessage = NotFoundMessage {
    title: "المصدر غير موجود",
    description: "لم يتم العثور على المصدر المطلوب.",
};

pub const HADITH_NOT_FOUND: NotFoundMessage = NotFoundMessage {
    title: "الحديث غير موجود",
    description: "لم يتم العثور على الحديث المطلوب.",
};

pub const NARRATOR_NOT_FOUND: NotFoundMessage = NotFoundMessage {
    title: "الراوي غير موجود",
    description: "لم يتم العثور على الراوي المطلوب.",
};

pub const TRANSMISSION_NOT_FOUND: NotFoundMessage = NotFoundMessage {
    title: "لا توجد أحاديث",
    description: "لم يتم العثور على أحاديث منقولة بين هذين الراويين.",
};

pub const PAGE_NOT_FOUND: NotFoundMessage = NotFoundMessage {
    title: "الصفحة غير موجودة",
    description: "لم يتم العثور على الصفحة المطلوبة.",
};

/// Replace Western digits with Eastern Arabic digits
pub fn to_arabic_numerals(value: impl ToString) -> String {
    value
        .to_string()
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => EASTERN_DIGITS[d as usize],
            None => c,
        })
        .collect()
}

/// Same as [`to_arabic_numerals`], applied to every digit run inside free text
pub fn convert_numbers_in_text(text: &str) -> String {
    to_arabic_numerals(text)
}

/// `"٧ أحاديث"`; the singular form is used only for exactly one
pub fn format_arabic_count(count: usize, singular: &str, plural: &str) -> String {
    let noun = if count == 1 { singular } else { plural };
    format!("{} {}", to_arabic_numerals(count), noun)
}

pub fn format_chapter_title(chapter_no: i64) -> String {
    format!("{} {}", ui_text::CHAPTER_NUMBER, to_arabic_numerals(chapter_no))
}

static LATIN_AND_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z\-',()]").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static STRAY_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s.\s|\s.$").expect("valid regex"));

/// Strip transliteration and honorifics from a narrator name.
///
/// Removes Latin letters and `-',()`, the phrase "رضي الله عنه", collapses whitespace
/// and drops single letters left standing between spaces or at the end.
pub fn clean_name(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = LATIN_AND_PUNCTUATION.replace_all(text, "");
    let text = text.replace("رضي الله عنه", "");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    let text = STRAY_LETTER.replace_all(&text, " ");
    text.trim().to_string()
}

/// Arabic rendering of a dataset grade; grades outside the known set are returned unchanged
pub fn arabic_grade(grade: &str) -> &str {
    match grade {
        "Rasool Allah" => "رسول الله ﷺ",
        "Prophet's Relative" => "من أهل البيت",
        "Prophet's Relative [Non-Muslim]" => "من  أقارب النبي (غير مسلم)",
        "Comp.(RA)"
        | "Comp.(RA) [1st Generation]"
        | "Comp.(RA) [2nd Generation]"
        | "Comp.(RA) [3rd Generation]"
        | "Comp.(RA) [4th generation]"
        | "Comp.(RA) [6th generation]"
        | "Comp.(RA) [7th generation]" => "من الصحابة",
        "Follower(Tabi')"
        | "Follower(Tabi') [1st Generation]"
        | "Follower(Tabi') [2nd Generation]"
        | "Follower(Tabi') [3rd Generation]"
        | "Follower(Tabi') [4th generation]"
        | "Follower(Tabi') [5th generation]"
        | "Follower(Tabi') [6th generation]"
        | "Follower(Tabi') [7th generation]"
        | "Follower(Tabi') [8th generation]"
        | "Follower(Tabi') [9th generation]"
        | "Follower(Tabi') [11th generation]" => "من التابعين",
        "Succ. (Taba' Tabi')"
        | "Succ. (Taba' Tabi') [6th generation]"
        | "Succ. (Taba' Tabi') [7th generation]"
        | "Succ. (Taba' Tabi') [7th generation] [Maliki]"
        | "Succ. (Taba' Tabi') [8th generation]"
        | "Succ. (Taba' Tabi') [9th generation]"
        | "Succ. (Taba' Tabi') [9th generation] [Shafi'ee]"
        | "Succ. (Taba' Tabi') [10th generation]"
        | "Succ. (Taba' Tabi') [Hanafi]" => "من تابعي التابعين",
        "3rd Century AH"
        | "3rd Century AH [10th generation]"
        | "3rd Century AH [10th generation] [Hanafi]"
        | "3rd Century AH [10th generation] [Hanbali]"
        | "3rd Century AH [11th generation]"
        | "3rd Century AH [11th generation] [Hanafi]"
        | "3rd Century AH [11th generation] [Shafi'ee]"
        | "3rd Century AH [12th generation]"
        | "3rd Century AH [Shafi'ee]" => "من علماء القرن الثالث الهجري",
        "4th Century AH"
        | "4th Century AH [Hanbali]"
        | "4th Century AH [Shafi'ee]"
        | "4th Century AH [Other]" => "من علماء القرن الرابع الهجري",
        other => other,
    }
}

/// Honorific that follows a narrator of the given Arabic grade, empty when none applies
pub fn blessings(arabic_grade: &str) -> &'static str {
    match arabic_grade {
        "من الصحابة" | "من التابعين" => "رضي الله عنه",
        "من تابعي التابعين" | "من علماء القرن الثالث الهجري" | "من علماء القرن الرابع الهجري" => {
            "رحمه الله"
        }
        _ => "",
    }
}

/// Arabic title of one of the six collections
pub fn arabic_source(book: &str) -> Option<&'static str> {
    match book {
        "Jami' al-Tirmidhi" => Some("جامع الترمذي"),
        "Sahih Bukhari" => Some("صحيح البخاري"),
        "Sahih Muslim" => Some("صحيح مسلم"),
        "Sunan Abi Da'ud" => Some("سنن أبي داود"),
        "Sunan Ibn Majah" => Some("سنن ابن ماجه"),
        "Sunan an-Nasa'i" => Some("سنن النسائي"),
        _ => None,
    }
}

/// Arabic title when known, the dataset name otherwise
pub fn source_title(book: &str) -> &str {
    arabic_source(book).unwrap_or(book)
}

/// Readable title of a biographical reference from `sources.book_source`; unknown keys pass through
pub fn book_source_title(book_source: &str) -> &str {
    const TITLES: [(&str, &str); 10] = [
        ("ميزان الاعتدال", "ميزان الاعتدال للذهبى"),
        ("التاريخ الكبير", "التاريخ الكبير للبخارى"),
        ("سير أعلام النبلاء", "سير أعلام النبلاء للذهبى"),
        ("الإصابة", "الإصابة في تمييز الصحابة لابن حجر"),
        ("لسان الميزان", "لسان الميزان لابن حجر"),
        ("تقريب التهذيب", "تقريب التهذيب لابن حجر العسقلانى"),
        ("تهذيب التهذيب", "تهذيب التهذيب لابن حجر العسقلانى"),
        ("الطبقات الكبرى", "الطبقات الكبرى لابن سعد"),
        ("ثقات ابن حبان", "ثقات ابن حبان"),
        ("Names used in Hadith Literature", "ورد في هذه السياقات فى كتب الحديث"),
    ];
    TITLES
        .iter()
        .find(|(key, _)| book_source.contains(key))
        .map(|(_, title)| *title)
        .unwrap_or(book_source)
}

/// File-system safe form of a collection name
pub fn sanitize_source_for_path(source: &str) -> String {
    WHITESPACE_RUN.replace_all(source.trim(), "_").into_owned()
}

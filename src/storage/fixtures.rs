//! Small seeded dataset shared by tests across the crate

use super::SqliteStore;

pub const BUKHARI: &str = "Sahih Bukhari";
pub const REVELATION: &str = "كتاب بدء الوحى";
pub const BELIEF: &str = "كتاب الإيمان";

/// Five hadiths (one without a chain), eight narrators (one without hadiths).
pub const SEED_SQL: &str = r#"
INSERT INTO rawis (scholar_indx, name, full_name, grade, parents, birth_date_hijri, birth_date_gregorian, death_date_hijri, death_date_gregorian, death_place) VALUES
    (1, 'أمّ المؤمنين عائشة بنت أبي بكر الصديق', NULL, 'Comp.(RA)', 'أبو بكر الصديق', NULL, 613, 58, 678, 'المدينة'),
    (2, 'عروة بن الزبير', NULL, 'Follower(Tabi'')', 'الزبير بن العوام', 23, 644, 94, 713, 'المدينة'),
    (3, 'هشام بن عروة', NULL, 'Follower(Tabi'')', 'عروة بن الزبير', 61, 680, 146, 763, 'بغداد'),
    (4, 'مالك بن أنس بن مالك بن أبي عامر', NULL, 'Succ. (Taba'' Tabi'')', 'أنس بن مالك', 93, 711, 179, 795, 'المدينة'),
    (5, 'عبد الله بن يوسف التنيسي', NULL, '3rd Century AH', NULL, NULL, NULL, 218, 833, NULL),
    (6, 'ابن شهاب الزهري', NULL, 'Follower(Tabi'') [4th generation]', NULL, 50, 670, 124, 742, NULL),
    (7, 'أبو هريرة', NULL, 'Comp.(RA)', NULL, NULL, NULL, 57, 676, NULL),
    (8, 'راوٍ بلا أحاديث', NULL, '4th Century AH', NULL, NULL, NULL, NULL, NULL, NULL);

INSERT INTO hadiths (id, hadith_id, source, chapter_no, hadith_no, chapter, text_ar, text_en, explanation) VALUES
    (1, 1, 'Sahih Bukhari', 1, '1', 'كتاب بدء الوحى', 'إِنَّمَا الأَعْمَالُ بِالنِّيَّاتِ', 'Actions are judged by intentions', NULL),
    (2, 2, 'Sahih Bukhari', 1, '2', 'كتاب بدء الوحى', 'أَحْيَانًا يَأْتِينِي مِثْلَ صَلْصَلَةِ الْجَرَسِ', 'Sometimes it comes like the ringing of a bell', 'شرح الحديث الثاني'),
    (3, 3, 'Sahih Bukhari', 1, '3', 'كتاب بدء الوحى', 'أَوَّلُ مَا بُدِئَ بِهِ رَسُولُ اللَّهِ الرُّؤْيَا الصَّالِحَةُ', 'The commencement of the Divine Inspiration was in the form of good dreams', 'شرح بدء الوحي'),
    (4, 10, 'Sahih Bukhari', 1, '10', 'كتاب بدء الوحى', 'الْمُسْلِمُ مَنْ سَلِمَ الْمُسْلِمُونَ', 'A Muslim is the one who avoids harming Muslims', ''),
    (5, 8, 'Sahih Bukhari', 2, '8', 'كتاب الإيمان', 'بُنِيَ الإِسْلاَمُ عَلَى خَمْسٍ', 'Islam is based on five', 'شرح أركان الإسلام');

INSERT INTO hadith_chains (source, chapter_no, hadith_no, scholar_indx, position) VALUES
    ('Sahih Bukhari', 1, '1', 7, 1),
    ('Sahih Bukhari', 1, '1', 6, 2),
    ('Sahih Bukhari', 1, '2', 1, 1),
    ('Sahih Bukhari', 1, '2', 2, 2),
    ('Sahih Bukhari', 1, '2', 3, 3),
    ('Sahih Bukhari', 1, '2', 4, 4),
    ('Sahih Bukhari', 1, '2', 5, 5),
    ('Sahih Bukhari', 1, '3', 1, 1),
    ('Sahih Bukhari', 1, '3', 2, 2),
    ('Sahih Bukhari', 1, '3', 6, 3),
    ('Sahih Bukhari', 2, '8', 1, 1),
    ('Sahih Bukhari', 2, '8', 3, 2);

INSERT INTO sources (scholar_indx, book_source, content) VALUES
    (1, 'الإصابة', 'زوج النبي'),
    (1, 'سير أعلام النبلاء', 'أم المؤمنين، أفقه نساء الأمة على الإطلاق');
"#;

pub fn seeded_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    store.execute_batch(SEED_SQL).unwrap();
    store
}

//! Enumerator label classification.
//!
//! Statutes number their items with CJK numerals, iroha kana, full-width
//! digits or parenthesized numbers. The style is chosen from the first label
//! only; later labels are assumed to continue the same sequence.

const CJK_NUMERALS: [&str; 10] = ["一", "二", "三", "四", "五", "六", "七", "八", "九", "十"];

const KATAKANA_IROHA: [&str; 10] = ["イ", "ロ", "ハ", "ニ", "ホ", "ヘ", "ト", "チ", "リ", "ヌ"];

const HIRAGANA_IROHA: [&str; 10] = ["い", "ろ", "は", "に", "ほ", "へ", "と", "ち", "り", "ぬ"];

const FULLWIDTH_DIGITS: [&str; 9] = ["１", "２", "３", "４", "５", "６", "７", "８", "９"];

/// Labels that carry nothing beyond their position in the list.
const ORDINAL_MARKERS: [&str; 60] = [
    "一", "二", "三", "四", "五", "六", "七", "八", "九", "十",
    "十一", "十二", "十三", "十四", "十五", "十六", "十七", "十八", "十九", "二十",
    "イ", "ロ", "ハ", "ニ", "ホ", "ヘ", "ト", "チ", "リ", "ヌ",
    "ル", "ヲ", "ワ", "カ", "ヨ", "タ", "レ", "ソ", "ツ", "ネ",
    "１", "２", "３", "４", "５", "６", "７", "８", "９", "１０",
    "１１", "１２", "１３", "１４", "１５", "１６", "１７", "１８", "１９", "２０",
];

/// CSS `list-style-type` chosen for an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListStyle {
    None,
    Disc,
    Decimal,
    CjkIdeographic,
    KatakanaIroha,
    HiraganaIroha,
}

impl ListStyle {
    /// CSS keyword, empty for [`ListStyle::None`].
    pub fn css_name(self) -> &'static str {
        match self {
            ListStyle::None => "",
            ListStyle::Disc => "disc",
            ListStyle::Decimal => "decimal",
            ListStyle::CjkIdeographic => "cjk-ideographic",
            ListStyle::KatakanaIroha => "katakana-iroha",
            ListStyle::HiraganaIroha => "hiragana-iroha",
        }
    }
}

/// Pick a list style from the first label of a sequence.
pub fn classify<S: AsRef<str>>(labels: &[S]) -> ListStyle {
    let Some(first) = labels.first() else {
        return ListStyle::None;
    };
    let first = first.as_ref();

    if CJK_NUMERALS.contains(&first) {
        ListStyle::CjkIdeographic
    } else if KATAKANA_IROHA.contains(&first) {
        ListStyle::KatakanaIroha
    } else if HIRAGANA_IROHA.contains(&first) {
        ListStyle::HiraganaIroha
    } else if FULLWIDTH_DIGITS.contains(&first) || first.starts_with('1') {
        ListStyle::Decimal
    } else if first.starts_with('（') && first.ends_with('）') {
        ListStyle::Decimal
    } else {
        ListStyle::Disc
    }
}

/// True when `label` is a bare positional marker the list numbering already
/// shows.
pub fn is_ordinal_marker(label: &str) -> bool {
    ORDINAL_MARKERS.contains(&label)
}

/// Opening `<ol>` tag styled for the given labels.
pub fn open_list<S: AsRef<str>>(labels: &[S]) -> String {
    match classify(labels) {
        ListStyle::None | ListStyle::Disc => "<ol>".to_string(),
        style => format!(r#"<ol style="list-style-type: {};">"#, style.css_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_families() {
        assert_eq!(classify::<&str>(&[]), ListStyle::None);
        assert_eq!(classify(&["一", "二"]), ListStyle::CjkIdeographic);
        assert_eq!(classify(&["イ"]), ListStyle::KatakanaIroha);
        assert_eq!(classify(&["い"]), ListStyle::HiraganaIroha);
        assert_eq!(classify(&["１"]), ListStyle::Decimal);
        assert_eq!(classify(&["1."]), ListStyle::Decimal);
        assert_eq!(classify(&["（１）"]), ListStyle::Decimal);
        assert_eq!(classify(&["第一号"]), ListStyle::Disc);
        assert_eq!(classify(&[""]), ListStyle::Disc);
    }

    #[test]
    fn test_only_first_label_counts() {
        assert_eq!(classify(&["A", "一"]), ListStyle::Disc);
        assert_eq!(classify(&["ロ", "一"]), ListStyle::KatakanaIroha);
    }

    #[test]
    fn test_eleven_is_not_a_cjk_first_label() {
        // 十一 is an ordinal marker but never starts a cjk sequence.
        assert_eq!(classify(&["十一"]), ListStyle::Disc);
        assert!(is_ordinal_marker("十一"));
    }

    #[test]
    fn test_ordinal_markers() {
        assert!(is_ordinal_marker("二十"));
        assert!(is_ordinal_marker("ネ"));
        assert!(is_ordinal_marker("２０"));
        assert!(!is_ordinal_marker("い"));
        assert!(!is_ordinal_marker("（１）"));
        assert!(!is_ordinal_marker("1"));
        assert!(!is_ordinal_marker(""));
    }

    #[test]
    fn test_open_list() {
        assert_eq!(open_list::<&str>(&[]), "<ol>");
        assert_eq!(open_list(&["ア"]), "<ol>");
        assert_eq!(
            open_list(&["一"]),
            r#"<ol style="list-style-type: cjk-ideographic;">"#
        );
        assert_eq!(
            open_list(&["（１）"]),
            r#"<ol style="list-style-type: decimal;">"#
        );
    }

    static FAMILIES: [(&[&str], ListStyle); 4] = [
        (&CJK_NUMERALS, ListStyle::CjkIdeographic),
        (&KATAKANA_IROHA, ListStyle::KatakanaIroha),
        (&HIRAGANA_IROHA, ListStyle::HiraganaIroha),
        (&FULLWIDTH_DIGITS, ListStyle::Decimal),
    ];

    proptest! {
        #[test]
        fn prop_first_label_decides_family(
            (labels, style) in prop::sample::select(&FAMILIES[..]),
            first in 0usize..9,
            rest in prop::collection::vec("\\PC{0,4}", 0..5)
        ) {
            let mut sequence = vec![labels[first].to_string()];
            sequence.extend(rest);
            prop_assert_eq!(classify(&sequence), style);
        }

        #[test]
        fn prop_other_first_labels_are_disc(first in "[a-zA-Z][a-zA-Z0-9]{0,3}") {
            prop_assert_eq!(classify(&[first.as_str(), "一"]), ListStyle::Disc);
        }

        #[test]
        fn prop_ordinal_markers_are_recognized(i in 0usize..ORDINAL_MARKERS.len()) {
            prop_assert!(is_ordinal_marker(ORDINAL_MARKERS[i]));
        }
    }
}

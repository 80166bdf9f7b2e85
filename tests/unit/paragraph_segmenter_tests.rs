/*!
 * Tests for paragraph segmentation
 */

use captionflow::app_config::SegmentationConfig;
use captionflow::errors::CaptionError;
use captionflow::paragraph_segmenter::{Paragraph, ParagraphSegmenter, segment};
use crate::common;

fn texts(paragraphs: &[Paragraph]) -> Vec<&str> {
    paragraphs.iter().map(|p| p.text()).collect()
}

fn word_counts(paragraphs: &[Paragraph]) -> Vec<usize> {
    paragraphs.iter().map(|p| p.word_count()).collect()
}

#[test]
fn test_segment_withShortPunctuatedLines_shouldBuildSingleParagraph() {
    let lines = ["hello world.", "This is great!", "Yes it is."];
    let paragraphs = segment(&lines).unwrap();

    assert_eq!(texts(&paragraphs), vec!["Hello world. This is great! Yes it is."]);
}

#[test]
fn test_segment_withEmptyInput_shouldReturnEmptyInputError() {
    let lines: Vec<String> = Vec::new();
    assert_eq!(segment(&lines), Err(CaptionError::EmptyInput));
}

#[test]
fn test_segment_withBlankLinesOnly_shouldReturnEmptyInputError() {
    assert_eq!(segment(&["   ", "", "\t"]), Err(CaptionError::EmptyInput));
}

#[test]
fn test_segment_withEightyUnpunctuatedWords_shouldCutAtSeventy() {
    let lines = common::words(80, "w");
    let paragraphs = segment(&lines).unwrap();

    assert_eq!(word_counts(&paragraphs), vec![70, 10]);
    assert!(paragraphs[0].text().starts_with("W1 w2 w3"));
    assert!(paragraphs[0].text().ends_with("w70"));
    assert_eq!(paragraphs[1].text(), "W71 w72 w73 w74 w75 w76 w77 w78 w79 w80");
}

#[test]
fn test_rechunkSentence_withFortyWords_shouldSplitIntoTwentyFiveAndFifteen() {
    let segmenter = ParagraphSegmenter::default();
    let sentence = common::sentence(40, "s");

    let chunks = segmenter.rechunk_sentence(&sentence);
    let sizes: Vec<usize> = chunks.iter().map(|c| c.split_whitespace().count()).collect();
    assert_eq!(sizes, vec![25, 15]);
    assert_eq!(chunks.join(" "), sentence);

    // Both chunks still fit under the paragraph threshold
    let paragraphs = segment(&[sentence.clone()]).unwrap();
    assert_eq!(word_counts(&paragraphs), vec![40]);
}

#[test]
fn test_rechunkSentence_atThreshold_shouldKeepSentenceWhole() {
    let segmenter = ParagraphSegmenter::default();

    let at_limit = common::sentence(35, "a");
    assert_eq!(segmenter.rechunk_sentence(&at_limit), vec![at_limit.clone()]);

    let over_limit = common::sentence(36, "b");
    let sizes: Vec<usize> = segmenter
        .rechunk_sentence(&over_limit)
        .iter()
        .map(|c| c.split_whitespace().count())
        .collect();
    assert_eq!(sizes, vec![25, 11]);
}

#[test]
fn test_segment_withLongRunOnSentence_shouldNeverEmitItUnsplit() {
    let sentence = common::sentence(100, "r");
    let paragraphs = segment(&[sentence]).unwrap();

    // 25-word chunks accumulate: 25, 50, 75 closes at 75; then 25 remains
    assert_eq!(word_counts(&paragraphs), vec![75, 25]);
}

#[test]
fn test_segment_withTwentyWordSentences_shouldCloseAtSixty() {
    let lines: Vec<String> = (0..4).map(|i| common::sentence(20, &format!("p{}x", i))).collect();
    let paragraphs = segment(&lines).unwrap();

    assert_eq!(word_counts(&paragraphs), vec![60, 20]);
}

#[test]
fn test_segment_withOvershootingSentence_shouldCloseAfterIt() {
    let lines = vec![
        common::sentence(30, "a"),
        common::sentence(31, "b"),
        common::sentence(10, "c"),
    ];
    let paragraphs = segment(&lines).unwrap();

    assert_eq!(word_counts(&paragraphs), vec![61, 10]);
}

#[test]
fn test_segment_withSentencesSpanningLines_shouldSplitOnPunctuationNotLines() {
    let lines = ["this sentence spans", "two lines. And this", "one continues? yes"];
    let paragraphs = segment(&lines).unwrap();

    assert_eq!(
        texts(&paragraphs),
        vec!["This sentence spans two lines. And this one continues? yes"]
    );
}

#[test]
fn test_segment_withUppercaseLookahead_shouldCutBeforeCapitalizedLine() {
    let lines = ["hello there", "my friend", "How are you", "fine thanks"];
    let paragraphs = segment(&lines).unwrap();

    assert_eq!(texts(&paragraphs), vec!["Hello there my friend", "How are you fine thanks"]);
}

#[test]
fn test_segment_withDiscourseMarkers_shouldCutBeforeMarkerLines() {
    let lines = ["we tried", "however it failed", "sin embargo seguimos", "y ya"];
    let paragraphs = segment(&lines).unwrap();

    assert_eq!(
        texts(&paragraphs),
        vec!["We tried", "However it failed", "Sin embargo seguimos y ya"]
    );
}

#[test]
fn test_segment_withMarkerAsWordPrefix_shouldNotCut() {
    let lines = ["we went", "sober now", "butter too", "entonceses no"];
    let paragraphs = segment(&lines).unwrap();

    assert_eq!(texts(&paragraphs), vec!["We went sober now butter too entonceses no"]);
}

#[test]
fn test_segment_withBlankLinesInCadence_shouldSkipThemWithoutCutting() {
    let lines = ["one", "", "   ", "two"];
    let paragraphs = segment(&lines).unwrap();

    assert_eq!(texts(&paragraphs), vec!["One two"]);
}

#[test]
fn test_segment_shouldCapitalizeOnlyFirstCharacter() {
    let paragraphs = segment(&["hELLO wORLD."]).unwrap();
    assert_eq!(texts(&paragraphs), vec!["HELLO wORLD."]);

    let paragraphs = segment(&["élan vital sin puntos"]).unwrap();
    assert_eq!(texts(&paragraphs), vec!["Élan vital sin puntos"]);
}

#[test]
fn test_segment_withPunctuatedInput_shouldPreserveEveryWord() {
    let mut lines = Vec::new();
    for i in 0..12 {
        lines.push(common::sentence(5 + (i * 7) % 45, &format!("l{}w", i)));
    }
    lines.push("and a tail without a period".to_string());

    let paragraphs = segment(&lines).unwrap();

    let lowered = |texts: Vec<String>| -> Vec<String> {
        let mut words: Vec<String> = texts.into_iter().map(|w| w.to_lowercase()).collect();
        words.sort();
        words
    };
    assert_eq!(
        lowered(common::sorted_words(&paragraphs)),
        lowered(common::sorted_words(&lines))
    );

    // Every paragraph but the last closed as soon as it reached the threshold
    for paragraph in &paragraphs[..paragraphs.len() - 1] {
        assert!(paragraph.word_count() >= 60);
    }
}

#[test]
fn test_segment_withUnpunctuatedInput_shouldPreserveEveryWord() {
    let lines: Vec<String> = (0..30)
        .map(|i| common::words(1 + i % 6, &format!("c{}n", i)).join(" "))
        .collect();

    let paragraphs = segment(&lines).unwrap();

    let lowered = |texts: Vec<String>| -> Vec<String> {
        let mut words: Vec<String> = texts.into_iter().map(|w| w.to_lowercase()).collect();
        words.sort();
        words
    };
    assert_eq!(
        lowered(common::sorted_words(&paragraphs)),
        lowered(common::sorted_words(&lines))
    );

    // No lookahead cut can fire, so every non-final paragraph hit the cadence limit
    for paragraph in &paragraphs[..paragraphs.len() - 1] {
        assert!(paragraph.word_count() >= 70);
    }
}

#[test]
fn test_segment_reappliedToPunctuatedOutput_shouldKeepBoundaries() {
    let lines = vec![
        common::sentence(12, "a"),
        common::sentence(40, "b"),
        common::sentence(18, "c"),
        common::sentence(33, "d"),
        common::sentence(9, "e"),
    ];

    let first = segment(&lines).unwrap();
    let rejoined = vec![first.iter().map(|p| p.text()).collect::<Vec<_>>().join(" ")];
    let second = segment(&rejoined).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_segment_withCustomThresholds_shouldUseConfig() {
    let config = SegmentationConfig {
        long_sentence_words: 6,
        sentence_chunk_words: 3,
        punctuated_paragraph_words: 5,
        cadence_paragraph_words: 4,
        discourse_markers: vec!["Luego".to_string()],
    };
    let segmenter = ParagraphSegmenter::new(config);

    let punctuated = segmenter.segment(&["one two three four five six seven."]).unwrap();
    assert_eq!(word_counts(&punctuated), vec![6, 1]);

    let cadence = segmenter.segment(&["a b", "c d", "e", "luego f", "however g"]).unwrap();
    assert_eq!(texts(&cadence), vec!["A b c d", "E", "Luego f however g"]);
}

#[test]
fn test_segment_withoutDiscourseMarkers_shouldOnlyUseCaseAndCadence() {
    let config = SegmentationConfig {
        discourse_markers: Vec::new(),
        ..SegmentationConfig::default()
    };
    let segmenter = ParagraphSegmenter::new(config);

    let paragraphs = segmenter.segment(&["we tried", "however it failed"]).unwrap();
    assert_eq!(texts(&paragraphs), vec!["We tried however it failed"]);
}

#[test]
fn test_segment_withZeroChunkSize_shouldChunkWordByWordWithoutPanicking() {
    let config = SegmentationConfig {
        long_sentence_words: 3,
        sentence_chunk_words: 0,
        ..SegmentationConfig::default()
    };
    let segmenter = ParagraphSegmenter::new(config);

    assert_eq!(
        segmenter.rechunk_sentence("one two three four five."),
        vec!["one", "two", "three", "four", "five."]
    );

    let paragraphs = segmenter.segment(&["one two three four five."]).unwrap();
    assert_eq!(texts(&paragraphs), vec!["One two three four five."]);
}

use quiz_core::import::SkipReason;
use quiz_core::time::fixed_clock;
use services::{ImportError, TopicService};

const GEOGRAPHY: &str = "\
\u{feff}Question,Choice A,Choice B,Choice C,Choice D,Answer,Explanation\r
What is the capital of Italy?,Paris,Rome,Berlin,Madrid,B,\"Rome, not Milan.\"\r
\"Which river flows through \"\"the Eternal City\"\"?\",Tiber,Po,Arno,Adige,Tiber,\r
Broken row with too few columns,Paris,Rome\r
Which is a continent?,Asia,,,,Asia,Only one option survives\r
";

#[test]
fn import_keeps_good_rows_and_reports_the_rest() {
    let mut topics = TopicService::default().with_clock(fixed_clock());
    let outcome = topics.import_topic("Geography", GEOGRAPHY).unwrap();

    let questions = outcome.topic.questions();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].options(), ["Paris", "Rome", "Berlin", "Madrid"]);
    assert_eq!(questions[0].explanation(), Some("Rome, not Milan."));
    assert!(questions[0].is_correct("Rome"));
    assert_eq!(
        questions[1].question(),
        "Which river flows through \"the Eternal City\"?"
    );
    assert!(questions[1].is_correct("Tiber"));

    let lines: Vec<_> = outcome.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![4, 5]);
    assert!(matches!(
        outcome.diagnostics[0].reason,
        SkipReason::ColumnCountMismatch {
            expected: 7,
            found: 3
        }
    ));
    assert!(matches!(
        outcome.diagnostics[1].reason,
        SkipReason::InsufficientData(_)
    ));
}

#[test]
fn duplicate_import_leaves_a_single_topic() {
    let mut topics = TopicService::default();
    topics.import_topic("Math", "q,a,b,answer\n1+1?,2,3,2\n").unwrap();

    for variant in ["Math", "math", "MATH", " mAtH "] {
        let err = topics
            .import_topic(variant, "q,a,b,answer\n2+2?,4,5,4\n")
            .unwrap_err();
        assert!(matches!(err, ImportError::DuplicateName { .. }));
    }

    let listed = topics.list_topics();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name().as_str(), "Math");
    assert_eq!(listed[0].questions()[0].question(), "1+1?");
}

#[test]
fn topics_list_newest_first() {
    let mut topics = TopicService::default();
    for name in ["First", "Second", "Third"] {
        topics.import_topic(name, "q,a,b,answer\nQ,x,y,x\n").unwrap();
    }
    let names: Vec<_> = topics
        .list_topics()
        .iter()
        .map(|topic| topic.name().to_string())
        .collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);
}

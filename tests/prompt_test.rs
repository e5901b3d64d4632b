//! Tests for prompt templates and combined batch prompts.

use marketscope::prompt::{
    build_combined_prompt, build_prompt, parse_combined_response, resolve_prompt, section_marker,
    template, template_for_raw,
};
use marketscope::{AnalysisRequest, AnalysisType, BatchItem};

fn request(t: AnalysisType) -> AnalysisRequest {
    AnalysisRequest::new("Coffee", "Increase Sales", "Gen Z Creators", t)
}

fn bullet_count(prompt: &str) -> usize {
    prompt.lines().filter(|l| l.starts_with("- ")).count()
}

#[test]
fn every_template_carries_the_context_block() {
    let mut prompts: Vec<String> = AnalysisType::ALL
        .into_iter()
        .map(|t| build_prompt(&request(t)))
        .collect();
    prompts.push(template_for_raw(
        "Coffee",
        "Increase Sales",
        "Gen Z Creators",
        "not-a-real-type",
    ));

    for prompt in prompts {
        assert!(!prompt.is_empty());
        assert!(prompt.starts_with(
            "Product: Coffee\nObjective: Increase Sales\nSegment: Gen Z Creators\n\n"
        ));
    }
}

#[test]
fn templates_are_deterministic() {
    for t in AnalysisType::ALL {
        let first = build_prompt(&request(t));
        let second = build_prompt(&request(t));
        assert_eq!(first, second);
    }
}

#[test]
fn templates_differ_per_type() {
    let prompts: std::collections::HashSet<String> = AnalysisType::ALL
        .into_iter()
        .map(|t| build_prompt(&request(t)))
        .collect();
    assert_eq!(prompts.len(), AnalysisType::ALL.len());
}

#[test]
fn marketing_okrs_structure() {
    let prompt = build_prompt(&request(AnalysisType::MarketingOkrs));
    assert!(prompt.contains("### Objective"));
    assert!(prompt.contains("<one line objective rewritten for Gen Z Creators>"));
    assert!(prompt.contains("### Key Results"));
    for kr in ["- KR1:", "- KR2:", "- KR3:"] {
        assert!(prompt.contains(kr), "missing {kr}");
    }
    assert!(!prompt.contains("- KR4:"));
    assert_eq!(prompt.matches("baseline → target, and timebox").count(), 3);
    assert!(prompt.contains("### Notes"));
    // 3 key results + 2 notes
    assert_eq!(bullet_count(&prompt), 5);
}

#[test]
fn strengths_and_weaknesses_have_five_bullets() {
    let strengths = build_prompt(&request(AnalysisType::Strengths));
    assert!(strengths.contains("### Strengths"));
    assert!(strengths.contains("exactly 5 bullets (≤12 words each)"));
    assert_eq!(bullet_count(&strengths), 5);

    let weaknesses = build_prompt(&request(AnalysisType::Weaknesses));
    assert!(weaknesses.contains("### Weaknesses / Objections"));
    assert!(weaknesses.contains("≤12 words each"));
    assert_eq!(bullet_count(&weaknesses), 5);
}

#[test]
fn opportunities_and_threats_have_four_bullets() {
    let opportunities = build_prompt(&request(AnalysisType::Opportunities));
    assert!(opportunities.contains("### Opportunities"));
    assert_eq!(bullet_count(&opportunities), 4);
    assert_eq!(
        opportunities
            .matches("<why it matters for Gen Z Creators>")
            .count(),
        4
    );

    let threats = build_prompt(&request(AnalysisType::Threats));
    assert!(threats.contains("### Threats"));
    assert_eq!(bullet_count(&threats), 4);
    assert_eq!(threats.matches("Mitigation:").count(), 4);
}

#[test]
fn positioning_structure() {
    let prompt = build_prompt(&request(AnalysisType::Positioning));
    assert!(prompt.contains("### Market Positioning"));
    assert!(prompt.contains("**Tagline:** <≤7 words>"));
    assert!(prompt.contains("**Value Prop:** <≤22 words>"));
    assert!(prompt.contains("**Proof Points**"));
    assert_eq!(prompt.matches("- <≤10 words>").count(), 3);
}

#[test]
fn persona_structure() {
    let prompt = build_prompt(&request(AnalysisType::Persona));
    assert!(prompt.contains("### Buyer Persona"));
    assert!(prompt.contains("**Name:** <first name> (<age>)"));
    assert!(prompt.contains("**Role:** <role>"));
    for heading in ["**Goals**", "**Frictions**", "**Favorite Channels**"] {
        assert!(prompt.contains(heading), "missing {heading}");
    }
    assert_eq!(prompt.matches("<3 bullets>").count(), 3);
}

#[test]
fn investment_has_three_bullets() {
    let prompt = build_prompt(&request(AnalysisType::Investment));
    assert!(prompt.contains("### Investment Opportunities"));
    assert!(prompt.contains("exactly 3 bullets (≤14 words each)"));
    assert_eq!(bullet_count(&prompt), 3);
}

#[test]
fn channels_table_has_six_rows() {
    let prompt = build_prompt(&request(AnalysisType::Channels));
    assert!(prompt.contains("### Channels & Distribution"));
    assert!(prompt.contains("Channel | How to use it for Gen Z Creators"));
    assert!(prompt.contains("--- | ---"));
    let rows = prompt
        .lines()
        .filter(|l| l.starts_with("<channel> | "))
        .count();
    assert_eq!(rows, 6);
    assert_eq!(prompt.matches("<≤14 words, actionable>").count(), 6);
}

#[test]
fn unknown_type_falls_back_to_summary() {
    let prompt = template_for_raw("Coffee", "Increase Sales", "Gen Z Creators", "swot");
    assert!(prompt.contains("summary (≤120 words) with 3 bullets at the end"));
    assert_eq!(
        prompt,
        template("Coffee", "Increase Sales", "Gen Z Creators", None)
    );
}

#[test]
fn raw_prompt_override_passes_through_unchanged() {
    let raw = "  Custom prompt\nwith lines  ";
    let req = request(AnalysisType::Strengths).with_prompt(raw);
    assert_eq!(resolve_prompt(&req), raw);
    // The template itself ignores the override.
    assert!(build_prompt(&req).contains("### Strengths"));
}

#[test]
fn empty_override_uses_template() {
    let req = request(AnalysisType::Threats).with_prompt("");
    assert_eq!(resolve_prompt(&req), build_prompt(&req));
}

// ============================================================================
// Combined prompts
// ============================================================================

fn batch() -> Vec<BatchItem> {
    vec![
        BatchItem::new(
            "Coffee",
            "Increase Sales",
            "Gen Z Creators",
            vec![AnalysisType::Strengths, AnalysisType::MarketingOkrs],
        ),
        BatchItem::new(
            "Electric Cars",
            "Increase Awareness",
            "Urban Climate Advocates",
            vec![AnalysisType::Strengths],
        ),
    ]
}

#[test]
fn combined_prompt_sections() {
    let prompt = build_combined_prompt(&batch());
    assert!(prompt.starts_with("## Analysis for Coffee\n### STRENGTHS\nProduct: Coffee"));
    assert!(prompt.contains("### MARKETING-OKRS\nProduct: Coffee"));
    assert!(prompt.contains("\n\n## Analysis for Electric Cars\n### STRENGTHS\n"));
    assert!(prompt.contains("Segment: Urban Climate Advocates"));
    assert_eq!(section_marker(AnalysisType::Channels), "### CHANNELS");
}

#[test]
fn parse_combined_response_splits_per_item() {
    let text = "\
## Analysis for Coffee
### STRENGTHS
### Strengths
- Bold flavour
- Strong community
### MARKETING-OKRS
### Objective
Grow Gen Z sales

## Analysis for Electric Cars
### STRENGTHS
- Zero emissions
";
    let results = parse_combined_response(text, &batch());
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].product, "Coffee");
    assert_eq!(
        results[0].analyses["strengths"],
        "### Strengths\n- Bold flavour\n- Strong community"
    );
    assert_eq!(
        results[0].analyses["marketing-okrs"],
        "### Objective\nGrow Gen Z sales"
    );

    assert_eq!(results[1].segment, "Urban Climate Advocates");
    assert_eq!(results[1].analyses["strengths"], "- Zero emissions");
}

#[test]
fn parse_combined_response_reports_missing_sections_empty() {
    let results = parse_combined_response("nothing structured here", &batch());
    assert_eq!(results[0].analyses["strengths"], "");
    assert_eq!(results[0].analyses["marketing-okrs"], "");
    assert_eq!(results[1].analyses["strengths"], "");
    assert_eq!(results[0].analyses.len(), 2);
}

#[test]
fn parse_without_item_headings_fills_first_item() {
    let items = vec![BatchItem::new(
        "Coffee",
        "Increase Sales",
        "Gen Z Creators",
        vec![AnalysisType::Threats],
    )];
    let results = parse_combined_response("### THREATS\n- Price wars — Mitigation: loyalty\n", &items);
    assert_eq!(
        results[0].analyses["threats"],
        "- Price wars — Mitigation: loyalty"
    );
}

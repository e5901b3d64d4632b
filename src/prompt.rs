//! Prompt templates, one per analysis type.
//!
//! Each template is the shared context block (`Product:`, `Objective:`,
//! `Segment:`) followed by a structural block that pins down the exact
//! shape of the expected Markdown: headings, bullet counts, word ceilings
//! or table rows. Construction is pure string formatting.

use std::collections::BTreeMap;

use crate::types::{AnalysisRequest, AnalysisType, BatchItem, BatchResult};

/// Prompt for a validated request, honouring the raw `prompt` override.
pub fn resolve_prompt(request: &AnalysisRequest) -> String {
    match request.prompt.as_deref() {
        Some(prompt) if !prompt.is_empty() => prompt.to_string(),
        _ => build_prompt(request),
    }
}

/// Templated prompt for a validated request. Ignores any raw override.
pub fn build_prompt(request: &AnalysisRequest) -> String {
    template(
        &request.product,
        &request.objective,
        &request.segment,
        Some(request.analysis_type),
    )
}

/// Templated prompt for an unvalidated analysis-type identifier. Unknown
/// identifiers get the generic summary template.
pub fn template_for_raw(product: &str, objective: &str, segment: &str, analysis_type: &str) -> String {
    template(product, objective, segment, AnalysisType::parse(analysis_type))
}

/// Build the prompt for `analysis_type`; `None` selects the generic
/// summary.
pub fn template(
    product: &str,
    objective: &str,
    segment: &str,
    analysis_type: Option<AnalysisType>,
) -> String {
    let ctx = format!("Product: {product}\nObjective: {objective}\nSegment: {segment}");
    let structure = match analysis_type {
        Some(t) => structure(t, segment),
        None => "Return **Markdown** summary (≤120 words) with 3 bullets at the end.".to_string(),
    };
    format!("{ctx}\n\n{structure}")
}

fn structure(analysis_type: AnalysisType, segment: &str) -> String {
    match analysis_type {
        AnalysisType::MarketingOkrs => format!(
            "You are a CMO. Return **Markdown** in this exact structure:\n\n\
             ### Objective\n<one line objective rewritten for {segment}>\n\n\
             ### Key Results\n\
             - KR1: <metric with baseline → target, and timebox>\n\
             - KR2: <metric with baseline → target, and timebox>\n\
             - KR3: <metric with baseline → target, and timebox>\n\n\
             ### Notes\n\
             - <one short risk or assumption>\n\
             - <one short dependency>"
        ),
        AnalysisType::Strengths => format!(
            "Return **Markdown** with a heading and exactly 5 bullets (≤12 words each).\n\n\
             ### Strengths\n{}",
            bullets("...", 5)
        ),
        AnalysisType::Weaknesses => format!(
            "Return **Markdown** with exactly 5 short bullets (≤12 words each).\n\n\
             ### Weaknesses / Objections\n{}",
            bullets("...", 5)
        ),
        AnalysisType::Opportunities => format!(
            "Return **Markdown** with 4 bullets. Each bullet: a 2–6 word theme, then a short why.\n\n\
             ### Opportunities\n{}",
            bullets(&format!("**<theme>** — <why it matters for {segment}>"), 4)
        ),
        AnalysisType::Threats => format!(
            "Return **Markdown** with 4 bullets. Each bullet includes a mitigation.\n\n\
             ### Threats\n{}",
            bullets("**<risk>** — Mitigation: <one line>", 4)
        ),
        AnalysisType::Positioning => format!(
            "Return **Markdown**:\n\n\
             ### Market Positioning\n\
             **Tagline:** <≤7 words>  \n\
             **Value Prop:** <≤22 words>  \n\n\
             **Proof Points**\n{}",
            bullets("<≤10 words>", 3)
        ),
        AnalysisType::Persona => "Return **Markdown** compact persona:\n\n\
             ### Buyer Persona\n\
             **Name:** <first name> (<age>)  \n\
             **Role:** <role>  \n\n\
             **Goals**\n- <3 bullets>\n\n\
             **Frictions**\n- <3 bullets>\n\n\
             **Favorite Channels**\n- <3 bullets>"
            .to_string(),
        AnalysisType::Investment => format!(
            "Return **Markdown** with exactly 3 bullets (≤14 words each).\n\n\
             ### Investment Opportunities\n{}",
            bullets("...", 3)
        ),
        AnalysisType::Channels => {
            let rows = vec!["<channel> | <≤14 words, actionable>"; 6].join("\n");
            format!(
                "Return a **Markdown table** with exactly 6 rows:\n\n\
                 ### Channels & Distribution\n\
                 Channel | How to use it for {segment}\n\
                 --- | ---\n{rows}"
            )
        }
    }
}

fn bullets(placeholder: &str, count: usize) -> String {
    vec![format!("- {placeholder}"); count].join("\n")
}

/// Marker line that introduces one analysis section in a combined prompt
/// and in the model's answer to it.
pub fn section_marker(analysis_type: AnalysisType) -> String {
    format!("### {}", analysis_type.as_str().to_ascii_uppercase())
}

const ITEM_HEADING: &str = "## Analysis for ";

/// One prompt covering several items, each with several analysis types.
///
/// Every item opens with `## Analysis for <product>`; every analysis
/// inside it opens with its [`section_marker`].
pub fn build_combined_prompt(items: &[BatchItem]) -> String {
    items
        .iter()
        .map(|item| {
            let analyses = item
                .analysis_types
                .iter()
                .map(|&t| {
                    let prompt = template(&item.product, &item.objective, &item.segment, Some(t));
                    format!("{}\n{prompt}\n", section_marker(t))
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("{ITEM_HEADING}{}\n{analyses}", item.product)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Split a response to [`build_combined_prompt`] back into per-item
/// sections.
///
/// Each `## Analysis for` heading advances to the next item; text before
/// the first heading belongs to the first item. Section markers are
/// matched exactly (upper-case identifiers), so the model's own
/// `### Strengths` style headings stay part of the section body. A
/// section runs until the next marker or item heading. Requested
/// sections the model omitted come back empty.
pub fn parse_combined_response(text: &str, items: &[BatchItem]) -> Vec<BatchResult> {
    let mut sections: Vec<BTreeMap<AnalysisType, Vec<&str>>> = vec![BTreeMap::new(); items.len()];
    let mut item: Option<usize> = None;
    let mut current: Option<(usize, AnalysisType)> = None;

    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed.starts_with(ITEM_HEADING) {
            item = Some(item.map_or(0, |i| i + 1));
            current = None;
            continue;
        }
        let index = item.unwrap_or(0);
        if let Some(t) = marker_type(trimmed) {
            current = Some((index, t));
            if let Some(map) = sections.get_mut(index) {
                map.entry(t).or_default();
            }
            continue;
        }
        if let Some((i, t)) = current {
            if let Some(lines) = sections.get_mut(i).and_then(|m| m.get_mut(&t)) {
                lines.push(line);
            }
        }
    }

    items
        .iter()
        .zip(sections)
        .map(|(item, found)| BatchResult {
            product: item.product.clone(),
            objective: item.objective.clone(),
            segment: item.segment.clone(),
            analyses: item
                .analysis_types
                .iter()
                .map(|t| {
                    let body = found
                        .get(t)
                        .map(|lines| lines.join("\n").trim().to_string())
                        .unwrap_or_default();
                    (t.as_str().to_string(), body)
                })
                .collect(),
        })
        .collect()
}

fn marker_type(line: &str) -> Option<AnalysisType> {
    let id = line.strip_prefix("### ")?;
    AnalysisType::ALL
        .into_iter()
        .find(|t| t.as_str().to_ascii_uppercase() == id.trim())
}

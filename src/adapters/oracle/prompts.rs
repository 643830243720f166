//! Prompt construction for the Groq classification oracle
//!
//! Renders typed batch and title requests into the prompt text the models
//! answer. All prompts demand a single JSON object so responses parse under
//! `response_format: json_object`.

use crate::pipeline::signals::PUBLIC_PROVIDERS;
use crate::ports::oracle::{DomainBatchRequest, MeetingContext, TitleBatchRequest, TitleContext};

/// System instructions for domain-batch classification
pub const BATCH_INSTRUCTIONS: &str = r#"You are a client identification specialist for a digital agency.

GOAL: Analyze meeting data and identify the CLIENT domain for each meeting.

The CLIENT is the company the agency provides services to (the primary customer).
NOT vendors, partners, agencies, or consultants.

IDENTIFICATION STRATEGY:
1. Analyze the meeting titles and title brand hints to determine the client. Titles often contain the client name (e.g., "EverMe Team Sync" -> everme.ai).
2. Look for patterns across meetings. If a domain appears consistently, it is likely the client.
3. Consider the organizer domain if it is external (not internal team).
4. If multiple external domains exist:
   - The one in the meeting title is likely the client
   - The one that appears most frequently across meetings is likely the client
   - The one with the most participants is likely the client
5. Never pick internal team domains or generic email providers.

OUTPUT REQUIREMENTS:
Respond with a single JSON object shaped exactly like:
{"seed_domain": "<seed domain>", "assignments": [{"meeting_id": "<id>", "client_domain": "<domain or null>", "confidence": <0.0-1.0 or null>, "reasoning": "<brief explanation>"}], "batch_reasoning": "<patterns you used, or null>"}

Confidence should be high (0.8+) when the domain appears in the title or is clearly the client, lower (0.5-0.7) when inferred from patterns.

Be precise and consistent. If the same client appears in multiple meetings, assign the same domain to all of them."#;

/// System instructions for title-only classification
pub const TITLE_INSTRUCTIONS: &str =
    "Extract clients from meeting titles per the rules given. Be conservative; return nulls when unsure. Respond with a single JSON object.";

/// Render one seed-domain batch request
pub fn domain_batch_prompt(request: &DomainBatchRequest) -> String {
    let mut prompt = format!(
        "You are identifying the CLIENT for meetings that all include the domain: {}\n\n\
         Client definition:\n\
         - The CLIENT is the company the agency works for (not a vendor/partner/agency).\n\
         - Use patterns across all meetings in this batch.\n\n\
         Exclude internal domains: {}\n\
         Exclude generic providers: {}\n",
        request.seed_domain,
        request.internal_domains.join(", "),
        PUBLIC_PROVIDERS.join(", "),
    );

    if !request.internal_keywords.is_empty() {
        prompt.push_str(&format!(
            "\nImportant keyword hints:\n\
             - These keywords refer to the internal team, never a client: {}\n",
            request.internal_keywords.join(", ")
        ));
    }

    prompt.push_str(
        "\nInstructions:\n\
         - For EACH meeting below, decide the client domain by analyzing BOTH the title/title brand and the external domains.\n\
         - If the seed domain appears to be the client, choose it.\n\
         - If another external domain is clearly the client (by title, organizer, or recurring presence), choose that.\n\
         - If truly ambiguous, set client_domain to null and explain briefly.\n\n\
         Meetings in batch:\n",
    );

    for (index, meeting) in request.meetings.iter().enumerate() {
        prompt.push_str(&meeting_block(index + 1, meeting));
    }

    prompt.push_str("\nDecide client_domain for each meeting. Be consistent across the batch.\n");
    prompt
}

/// Render a title-only request, targeted or generic
pub fn title_prompt(request: &TitleBatchRequest) -> String {
    let mut prompt = match &request.target_client {
        Some(target) => format!(
            "You are identifying if meetings belong to a SPECIFIC CLIENT: \"{target}\"\n\n\
             These meetings have NO external domains, so analyze titles to determine if they belong to \"{target}\".\n\n\
             Rules:\n\
             - Analyze the title and title brand to see if they indicate \"{target}\".\n\
             - If the title clearly indicates \"{target}\", set client_name=\"{target}\" (or client_domain if you know it).\n\
             - If the title does NOT indicate \"{target}\", return nulls (do not assign).\n\
             - Do NOT output dates/times or \"Untitled\" or internal team references as client_name.\n\
             - If unsure, return nulls.\n"
        ),
        None => "You are identifying CLIENTS from MEETING TITLES for meetings that have NO external domains.\n\n\
             Rules:\n\
             - Analyze the title and title brand to determine the client.\n\
             - If you can confidently map the brand to a domain, set client_domain.\n\
             - If no domain is available but the title clearly indicates a proper company brand (e.g., \"Croffle Guys\", \"HME\"), set client_name and leave client_domain null.\n\
             - Do NOT output dates/times or \"Untitled\" or internal team references as client_name.\n\
             - If unsure, return nulls.\n"
            .to_string(),
    };

    if !request.internal_domains.is_empty() {
        prompt.push_str(&format!(
            "\nInternal team domains (never a client): {}\n",
            request.internal_domains.join(", ")
        ));
    }
    if !request.internal_keywords.is_empty() {
        prompt.push_str(&format!(
            "\nImportant keyword hints:\n\
             - These keywords refer to the internal team, never a client: {}\n",
            request.internal_keywords.join(", ")
        ));
    }
    if !request.known_domains.is_empty() {
        prompt.push_str(&format!(
            "\nClient domains already seen this run (context only): {}\n",
            request.known_domains.join(", ")
        ));
    }

    prompt.push_str(
        "\nSeparator rule for two-sided titles (like \"X x Y\", \"X <> Y\"):\n\
         - If one side is internal and the other side looks like a company/brand, prefer the non-internal side as client_name.\n\
         - If both sides are unclear, return nulls.\n\n\
         Respond with a single JSON object shaped exactly like:\n\
         {\"assignments\": [{\"meeting_id\": \"<id>\", \"client_domain\": \"<domain or null>\", \"client_name\": \"<brand or null>\", \"confidence\": <0.0-1.0 or null>, \"reasoning\": \"<brief explanation>\"}]}\n\n\
         Meetings:\n",
    );

    for (index, meeting) in request.meetings.iter().enumerate() {
        prompt.push_str(&title_block(index + 1, meeting));
    }

    prompt.push_str("\nReturn the JSON object only.\n");
    prompt
}

fn meeting_block(number: usize, meeting: &MeetingContext) -> String {
    let externals = if meeting.external_domains.is_empty() {
        "none".to_string()
    } else {
        meeting.external_domains.join(", ")
    };
    let counts = meeting
        .participant_count_by_domain
        .iter()
        .map(|(domain, count)| format!("{}={}", domain, count))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "\n--- Meeting {} ---\n\
         ID: {}\n\
         Title: {}\n\
         Title brand: {}\n\
         External domains: {}\n\
         Participant counts: {}\n\
         Organizer domain: {}\n\
         Host domain: {}\n",
        number,
        meeting.meeting_id,
        meeting.title,
        meeting.title_brand,
        externals,
        counts,
        meeting.organizer_domain,
        meeting.host_domain,
    )
}

fn title_block(number: usize, meeting: &TitleContext) -> String {
    format!(
        "\n--- Meeting {} ---\n\
         ID: {}\n\
         Title: {}\n\
         Title brand: {}\n\
         Organizer domain: {}\n\
         Host domain: {}\n",
        number,
        meeting.meeting_id,
        meeting.title,
        meeting.title_brand,
        meeting.organizer_domain,
        meeting.host_domain,
    )
}

//! Request builders for the five provider call sites.
//!
//! Each builder assembles the complete request string: task framing, the
//! compact persona JSON, bounds, and the output keys the parsers read
//! back. The wording is an internal detail — the parsing layer is the
//! only consumer with expectations, and those are limited to the named
//! JSON keys.

use std::fmt::Write as _;

use voxprint_core::persona::Persona;

use crate::generator::{ReplySpec, ThreadSpec, TweetSpec};

/// Profile extraction: the one request that carries raw historical text.
pub fn profile_request(
  texts: &[&str],
  bio: Option<&str>,
  pinned_post: Option<&str>,
) -> String {
  let mut prompt = String::from(
    "Analyze the historical posts below and distill a reusable voice \
     profile: voice rules, tone defaults, weighted topics, formatting \
     preferences, hard constraints, and a handful of abstracted \
     signature patterns. Patterns must be abstracted style fragments, \
     never copies of the posts themselves.\n",
  );

  if let Some(bio) = bio {
    let _ = write!(prompt, "\nAccount bio:\n{bio}\n");
  }
  if let Some(pinned) = pinned_post {
    let _ = write!(prompt, "\nPinned post:\n{pinned}\n");
  }

  let _ = write!(prompt, "\nPosts ({} total):\n", texts.len());
  for text in texts {
    let _ = writeln!(prompt, "- {text}");
  }

  prompt.push_str(
    "\nRespond with a JSON object using the keys: display_name, \
     voice_rules {sentence_length, hook_styles, humor_style, \
     jargon_level, directness}, tone {spice_default, safe_mode}, topics \
     [{name, weight}], formatting {emoji_rate, punctuation_style, \
     line_breaks}, constraints {no_slurs, no_threats, max_chars}, \
     examples {signature_patterns}.",
  );
  prompt
}

fn char_bounds(min_chars: u32, max_chars: u32) -> String {
  if min_chars > 0 {
    format!("between {min_chars} and {max_chars} characters")
  } else {
    format!("at most {max_chars} characters")
  }
}

/// Topical tweet generation.
pub fn tweet_request(
  persona: &Persona,
  spec: &TweetSpec,
  examples: Option<&[String]>,
) -> String {
  let mut prompt = format!(
    "Write {n} tweet drafts about \"{topic}\" in the voice described by \
     this profile:\n{persona}\n\nSpice level: {spice}. Each draft must \
     be {bounds}. Optimize for {engagement} engagement without \
     engagement bait, question-style endings, or opinion-label openers.\n",
    n = spec.n,
    topic = spec.topic,
    persona = persona.to_prompt_context(),
    spice = spec.spice.as_str(),
    bounds = char_bounds(spec.min_chars, spec.max_chars),
    engagement = spec.target_engagement.as_str(),
  );

  if let Some(examples) = examples
    && !examples.is_empty()
  {
    prompt.push_str("\nStyle references from the account's history:\n");
    for example in examples {
      let _ = writeln!(prompt, "- {example}");
    }
  }

  prompt.push_str(
    "\nRespond with a JSON object: {\"drafts\": [{\"text\", \"tags\", \
     \"rationale\", \"confidence\", \"expected_engagement\", \
     \"suppression_risk\", \"algorithm_alignment_notes\"}]}. \
     expected_engagement is one of reply|like|repost|mixed; \
     suppression_risk is one of low|medium|high.",
  );
  prompt
}

/// Thread generation (outline or full draft).
pub fn thread_request(persona: &Persona, spec: &ThreadSpec) -> String {
  let mode = if spec.full_draft {
    "full drafts, ready to post"
  } else {
    "a one-line outline per tweet"
  };

  format!(
    "Plan a thread about \"{topic}\" in the voice described by this \
     profile:\n{persona}\n\nTarget {count} tweets as {mode}. Spice \
     level: {spice}. Each tweet must be {bounds} and add unique value; \
     the first tweet must work as a standalone hook. If the topic \
     cannot sustain {count} dense tweets, recommend fewer; never pad.\n\
     \nRespond with a JSON object: {{\"thread\": [{{\"text\", \
     \"purpose\", \"density_score\", \"unique_value\"}}], \
     \"recommended_tweet_count\", \"density_validated\", \
     \"hook_strength\", \"suppression_risks\", \"rationale\"}}.",
    topic = spec.topic,
    persona = persona.to_prompt_context(),
    count = spec.tweet_count,
    mode = mode,
    spice = spec.spice.as_str(),
    bounds = char_bounds(spec.min_chars, spec.max_chars),
  )
}

/// Reply generation against an existing post.
pub fn reply_request(persona: &Persona, spec: &ReplySpec) -> String {
  let mut prompt = format!(
    "Write {n} reply drafts to the post below in the voice described by \
     this profile:\n{persona}\n\nPost being replied to:\n{original}\n\n\
     Reply tone: {tone}. Each reply must be {bounds}, add distinct \
     value to the conversation, and avoid low-effort patterns (generic \
     praise, bare agreement, emoji-only).\n",
    n = spec.n,
    persona = persona.to_prompt_context(),
    original = spec.to_text,
    tone = spec.tone.as_str(),
    bounds = char_bounds(spec.min_chars, spec.max_chars),
  );

  if let Some(context) = &spec.context {
    let _ = write!(prompt, "\nAdditional context: {context}\n");
  }
  if let Some(intent) = spec.intent {
    let _ = write!(prompt, "\nReply intent: {}\n", intent.as_str());
  }

  prompt.push_str(
    "\nRespond with a JSON object: {\"replies\": [{\"text\", \
     \"approach\", \"intent\", \"rationale\", \"confidence\", \
     \"suppression_risk\", \"conversation_value\", \"value_added\"}]}.",
  );
  prompt
}

/// Which review rubric applies, derived from the draft kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewKind {
  Tweet,
  Thread,
  Reply,
}

impl ReviewKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Tweet => "tweet",
      Self::Thread => "thread",
      Self::Reply => "reply",
    }
  }
}

/// Draft review: persona alignment plus algorithm alignment.
pub fn review_request(
  persona: &Persona,
  draft_text: &str,
  kind: ReviewKind,
  auto_refine: bool,
) -> String {
  let refine = if auto_refine {
    "If the alignment score is below 80 or the suppression risk score \
     is above 50, include a revised_text that fixes the issues, and a \
     revision_reason."
  } else {
    "Do not include revised_text."
  };

  format!(
    "Review this {kind} draft for alignment with the voice profile \
     below, and separately for ranking-algorithm alignment \
     (suppression patterns, repetition risk, conversation value).\n\n\
     Profile:\n{persona}\n\nDraft:\n{draft}\n\n{refine}\n\n\
     Respond with a JSON object: {{\"alignment_score\" (0-100), \
     \"violations\", \"suggestions\", \"revised_text\", \
     \"algorithm_alignment_score\", \"suppression_risk_score\", \
     \"repetition_risk\" (low|medium|high), \"conversation_value\" \
     (low|medium|high), \"algorithm_issues\", \
     \"persona_algorithm_conflicts\" [{{\"persona_rule\", \
     \"algorithm_constraint\", \"resolution\"}}], \"revision_reason\"}}.",
    kind = kind.as_str(),
    persona = persona.to_prompt_context(),
    draft = draft_text,
    refine = refine,
  )
}

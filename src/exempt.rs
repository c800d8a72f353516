// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Exemption rules that remove repositories from staleness consideration.
//!
//! A repository is exempt when its name matches one of the configured
//! shell-style glob patterns or when one of its topic labels is listed as
//! exempt. Name matching is case-sensitive and short-circuits before any
//! topic lookup is issued.

use regex::Regex;
use tracing::{info, warn};

use crate::{
    client::{RepositoryClient, TopicLookup},
    error::Error,
    repository::Repository,
};

/// Compiled set of name patterns.
///
/// Each pattern is translated into an anchored regular expression. An
/// unterminated `[` is an ordinary character and braces carry no special
/// meaning. A translation that fails to compile is compared literally.
#[derive(Debug, Clone, Default,)]
pub struct NamePatterns
{
    patterns: Vec<NamePattern,>,
}

#[derive(Debug, Clone,)]
enum NamePattern
{
    Glob(Regex,),
    Literal(String,),
}

impl NamePatterns
{
    /// Compiles `patterns` into case-sensitive matchers.
    ///
    /// `*` matches any run of characters (including `/`), `?` a single
    /// character, and `[...]` / `[!...]` a character class. Braces are
    /// literal and `[^...]` is a class containing `^`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stale_repos::NamePatterns;
    ///
    /// let patterns = NamePatterns::compile(&["data-*", "conf-*"],);
    /// assert!(patterns.is_match("data-repo"));
    /// assert!(!patterns.is_match("conf"));
    /// ```
    pub fn compile<S: AsRef<str,>,>(patterns: &[S],) -> Self
    {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                match Regex::new(&translate(pattern,),) {
                    Ok(regex,) => NamePattern::Glob(regex,),
                    Err(error,) => {
                        warn!("Exempt pattern '{}' is not a valid glob ({}); matching literally", pattern, error);
                        NamePattern::Literal(pattern.to_owned(),)
                    }
                }
            },)
            .collect();

        Self {
            patterns,
        }
    }

    /// Returns `true` when no patterns are configured.
    pub fn is_empty(&self,) -> bool
    {
        self.patterns.is_empty()
    }

    /// Returns `true` when `name` matches any pattern.
    pub fn is_match(&self, name: &str,) -> bool
    {
        self.patterns.iter().any(|pattern| match pattern {
            NamePattern::Glob(regex,) => regex.is_match(name,),
            NamePattern::Literal(literal,) => literal == name,
        },)
    }
}

/// Translates a shell glob into an anchored regular expression.
///
/// `*` matches any run of characters, `?` a single character and `[...]`
/// a class, negated by a leading `!`. A `[` without a closing `]` is kept
/// as a literal bracket.
fn translate(pattern: &str,) -> String
{
    let chars: Vec<char,> = pattern.chars().collect();
    let mut translated = String::from("^(?s:",);
    let mut index = 0;

    while index < chars.len() {
        let current = chars[index];
        index += 1;
        match current {
            '*' => {
                while chars.get(index,) == Some(&'*',) {
                    index += 1;
                }
                translated.push_str(".*",);
            }
            '?' => translated.push('.',),
            '[' => match class_end(&chars, index,) {
                Some(end,) => {
                    translated.push_str(&translate_class(&chars[index..end],),);
                    index = end + 1;
                }
                None => translated.push_str("\\[",),
            },
            other => translated.push_str(&regex::escape(other.encode_utf8(&mut [0; 4],),),),
        }
    }

    translated.push_str(")\\z",);
    translated
}

/// Returns the index of the `]` closing a class whose body starts at
/// `start`. A `]` directly after the opening `[` or `[!` is part of the body.
fn class_end(chars: &[char], start: usize,) -> Option<usize,>
{
    let mut index = start;
    if chars.get(index,) == Some(&'!',) {
        index += 1;
    }
    if chars.get(index,) == Some(&']',) {
        index += 1;
    }
    chars
        .get(index..,)?
        .iter()
        .position(|c| *c == ']',)
        .map(|offset| index + offset,)
}

fn translate_class(body: &[char],) -> String
{
    let (negated, body,) = match body.split_first() {
        Some(('!', rest,),) => (true, rest,),
        _ => (false, body,),
    };

    let mut class = String::from(if negated { "[^" } else { "[" },);
    for (position, c,) in body.iter().enumerate() {
        match c {
            // Class operators and nesting in the regex dialect.
            '\\' | '[' | ']' | '^' | '&' | '~' => {
                class.push('\\',);
                class.push(*c,);
            }
            '-' if position > 0 && body[position - 1] == '-' => class.push_str("\\-",),
            other => class.push(*other,),
        }
    }
    class.push(']',);
    class
}

/// Exemption configuration applied to every repository of a scan.
#[derive(Debug, Clone, Default,)]
pub struct Exemptions
{
    names:  NamePatterns,
    topics: Vec<String,>,
}

impl Exemptions
{
    /// Builds exemptions from name patterns and topic labels.
    pub fn new<S: AsRef<str,>,>(name_patterns: &[S], topics: &[S],) -> Self
    {
        Self {
            names:  NamePatterns::compile(name_patterns,),
            topics: topics.iter().map(|topic| topic.as_ref().to_owned(),).collect(),
        }
    }
}

/// Decides whether `repository` is exempt from the stale check.
///
/// Topics are only fetched when no name pattern matched and topic exemptions
/// are configured. A repository whose topics are unavailable is not exempt.
///
/// # Errors
///
/// Propagates topic lookup failures other than "not found".
pub async fn is_exempt<C: RepositoryClient,>(
    client: &C,
    repository: &Repository,
    exemptions: &Exemptions,
) -> Result<bool, Error,>
{
    if !exemptions.names.is_empty() && exemptions.names.is_match(&repository.name,) {
        info!("{} is exempt from stale repo check", repository.html_url);
        return Ok(true,);
    }

    if exemptions.topics.is_empty() {
        return Ok(false,);
    }

    match client.fetch_topics(repository,).await? {
        TopicLookup::Labels(labels,) => {
            if labels.iter().any(|label| exemptions.topics.contains(label,),) {
                info!("{} is exempt from stale repo check", repository.html_url);
                return Ok(true,);
            }
            Ok(false,)
        }
        TopicLookup::Unavailable => {
            info!(
                "{} does not have topics enabled and may be a private temporary fork",
                repository.html_url
            );
            Ok(false,)
        }
    }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::{Exemptions, NamePatterns, is_exempt};
    use crate::{
        client::TopicLookup,
        testing::{FakeClient, repository},
    };

    #[test]
    fn name_patterns_follow_shell_glob_rules()
    {
        let cases: [(&str, &[&str], bool,); 13] = [
            ("exempt_repo", &["exempt_repo"], true,),
            ("data-repo", &["data-*", "conf-*"], true,),
            ("conf-repo", &["exempt_repo", "conf-*"], true,),
            ("conf", &["conf-*"], false,),
            ("repo", &["repo1", "repo-"], false,),
            ("repo", &[""], false,),
            ("repo7", &["repo?"], true,),
            ("repo7", &["repo[!0-9]"], false,),
            ("repox", &["repo[!0-9]"], true,),
            ("legacy-old", &["legacy-{old}"], false,),
            ("legacy-{old}", &["legacy-{old}"], true,),
            ("repoa", &["repo[^0-9]"], false,),
            ("repo[abcd", &["repo[abc*"], true,),
        ];

        for (name, patterns, expected,) in cases {
            let compiled = NamePatterns::compile(patterns,);
            assert_eq!(compiled.is_match(name), expected, "{name} against {patterns:?}");
        }
    }

    #[test]
    fn name_patterns_are_case_sensitive()
    {
        let compiled = NamePatterns::compile(&["Data-*"],);
        assert!(compiled.is_match("Data-lake"));
        assert!(!compiled.is_match("data-lake"));
    }

    #[test]
    fn star_spans_slashes()
    {
        let compiled = NamePatterns::compile(&["team*"],);
        assert!(compiled.is_match("team/tools"));
    }

    #[test]
    fn unterminated_bracket_is_literal()
    {
        let compiled = NamePatterns::compile(&["repo[abc"],);
        assert!(compiled.is_match("repo[abc"));
        assert!(!compiled.is_match("repoa"));

        let wildcard = NamePatterns::compile(&["repo[abc*"],);
        assert!(wildcard.is_match("repo[abc-tools"));
        assert!(!wildcard.is_match("repoa"));
    }

    #[test]
    fn class_operators_are_not_special()
    {
        let compiled = NamePatterns::compile(&["repo[a&&b]", "tool[~]"],);
        assert!(compiled.is_match("repo&"));
        assert!(compiled.is_match("tool~"));
        assert!(!compiled.is_match("repoc"));
    }

    #[test]
    fn leading_bracket_in_class_is_a_member()
    {
        let compiled = NamePatterns::compile(&["repo[]x]"],);
        assert!(compiled.is_match("repo]"));
        assert!(compiled.is_match("repox"));
        assert!(!compiled.is_match("repo"));
    }

    #[test]
    fn regex_metacharacters_are_literal()
    {
        let compiled = NamePatterns::compile(&["svc.api+(v2)"],);
        assert!(compiled.is_match("svc.api+(v2)"));
        assert!(!compiled.is_match("svcXapi(v2)"));
    }

    proptest! {
        #[test]
        fn trailing_star_matches_any_suffix(prefix in "[a-z]{1,12}", suffix in "[a-z0-9-]{0,12}") {
            let compiled = NamePatterns::compile(&[format!("{prefix}*")],);
            let name = format!("{prefix}{suffix}");
            prop_assert!(compiled.is_match(&name));
        }
    }

    #[tokio::test]
    async fn name_match_short_circuits_topic_lookup()
    {
        let client = FakeClient::default().with_topics("data-repo", TopicLookup::Unavailable,);
        let exemptions = Exemptions::new(&["data-*"], &["keep"],);

        let exempt = is_exempt(&client, &repository("data-repo",), &exemptions,)
            .await
            .expect("expected exemption check to succeed",);

        assert!(exempt);
        assert_eq!(client.topic_requests(), 0);
    }

    #[tokio::test]
    async fn topic_match_exempts_repository()
    {
        let client = FakeClient::default()
            .with_topics("not_exempt_repo", TopicLookup::Labels(vec!["exempt_topic".to_owned()],),);
        let exemptions = Exemptions::new(&[], &["exempt_topic"],);

        let exempt = is_exempt(&client, &repository("not_exempt_repo",), &exemptions,)
            .await
            .expect("expected exemption check to succeed",);

        assert!(exempt);
    }

    #[tokio::test]
    async fn unrelated_topics_do_not_exempt()
    {
        let client = FakeClient::default().with_topics(
            "not_exempt_repo",
            TopicLookup::Labels(vec!["not_exempt_topic".to_owned()],),
        );
        let exemptions = Exemptions::new(&["exempt_repo"], &["exempt_topic"],);

        let exempt = is_exempt(&client, &repository("not_exempt_repo",), &exemptions,)
            .await
            .expect("expected exemption check to succeed",);

        assert!(!exempt);
    }

    #[tokio::test]
    async fn unavailable_topics_are_not_exempt()
    {
        let client =
            FakeClient::default().with_topics("not_exempt_repo", TopicLookup::Unavailable,);
        let exemptions = Exemptions::new(&[], &["exempt_topic"],);

        let exempt = is_exempt(&client, &repository("not_exempt_repo",), &exemptions,)
            .await
            .expect("expected exemption check to succeed",);

        assert!(!exempt);
    }

    #[tokio::test]
    async fn topics_are_not_fetched_without_topic_exemptions()
    {
        let client = FakeClient::default();
        let exemptions = Exemptions::new(&["other"], &[],);

        let exempt = is_exempt(&client, &repository("repo",), &exemptions,)
            .await
            .expect("expected exemption check to succeed",);

        assert!(!exempt);
        assert_eq!(client.topic_requests(), 0);
    }

    #[tokio::test]
    async fn topic_lookup_failure_is_propagated()
    {
        let client = FakeClient::default().failing_topics("broken",);
        let exemptions = Exemptions::new(&[], &["exempt_topic"],);

        let result = is_exempt(&client, &repository("broken",), &exemptions,).await;
        assert!(matches!(result, Err(crate::Error::Service { .. })));
    }
}

//! Prompt templates for the assistant features.
//!
//! Prompts are written in Chinese because the directory content and the
//! expected model output are Chinese.

use crate::models::alumni::AlumniCandidate;

pub const EMPTY_CANDIDATES: &str = "（无）";

pub const DEFAULT_EMAIL_TOPIC: &str = "校友活动通知";
pub const DEFAULT_EMAIL_AUDIENCE: &str = "本校校友";
pub const DEFAULT_EMAIL_STYLE: &str = "正式友好";

pub fn summary_prompt(name: &str, major: &str, work: &str, bio: &str) -> String {
    format!(
        "为以下校友生成一段简短的“名片摘要”，50~120字，客观、可读性强：\n\
         姓名：{name}\n\
         专业：{major}\n\
         工作/公司：{work}\n\
         简介/说明：{bio}\n\
         不要任何引言，直接输出摘要文本。"
    )
}

pub fn draft_email_prompt(topic: &str, audience: &str, style: &str, points: &[String]) -> String {
    let points = points.join("; ");
    format!(
        "请写一封面向{audience}的邮件草稿，主题为“{topic}”，风格：{style}。\n\
         要点：{points}\n\
         要求：包含邮件主题建议、称呼、正文（简洁、有行动号召）、落款。"
    )
}

/// One line per candidate, or a placeholder when nothing matched.
pub fn candidate_lines(candidates: &[AlumniCandidate]) -> String {
    fn show<T: std::fmt::Display>(value: Option<&T>) -> String {
        value.map_or_else(|| "None".to_string(), ToString::to_string)
    }

    if candidates.is_empty() {
        return EMPTY_CANDIDATES.to_string();
    }

    candidates
        .iter()
        .map(|c| {
            format!(
                "- id={}, 姓名={}, 性别={}, 年龄={}, 电话={}, 邮箱={}, 专业={}, 城市={}, 国家={}, 摘要={}",
                c.id,
                c.name,
                show(c.gender.as_ref()),
                show(c.age.as_ref()),
                show(c.phone.as_ref()),
                show(c.email.as_ref()),
                show(c.major.as_ref()),
                show(c.city.as_ref()),
                show(c.country.as_ref()),
                c.snippet,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn ranked_search_prompt(query: &str, candidates: &[AlumniCandidate], limit: u64) -> String {
    let items = candidate_lines(candidates);
    format!(
        "用户搜索：{query}\n\
         以下是候选（最多{limit}条）：\n\
         {items}\n\n\
         请挑选最相关的前 5 名，并按相关度排序输出，每条给出一句话理由（简短）。\n\
         输出 JSON 数组，字段：id, reason。不要多余文本。"
    )
}

pub fn expansion_prompt(query: &str) -> String {
    format!(
        "把下面的中文查询扩写为若干相关关键词，输出 JSON 数组，例如：\n\
         [\"分布式存储\",\"对象存储\",\"一致性\",\"副本\",\"CAP\"]\n\
         只输出 JSON，不要解释。\n\
         查询：{query}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i32, name: &str) -> AlumniCandidate {
        AlumniCandidate {
            id,
            name: name.to_string(),
            gender: None,
            age: Some(28),
            phone: None,
            email: Some("wangwu@example.com".to_string()),
            grad_year: None,
            degree: None,
            major: Some("人工智能".to_string()),
            city: None,
            country: None,
            snippet: "算法工程师".to_string(),
        }
    }

    #[test]
    fn test_candidate_lines_empty_placeholder() {
        assert_eq!(candidate_lines(&[]), EMPTY_CANDIDATES);
    }

    #[test]
    fn test_candidate_lines_one_per_row() {
        let lines = candidate_lines(&[candidate(3, "王五"), candidate(4, "Lucy")]);
        assert_eq!(lines.lines().count(), 2);
        assert!(lines.starts_with("- id=3, 姓名=王五, 性别=None, 年龄=28"));
        assert!(lines.contains("摘要=算法工程师"));
    }

    #[test]
    fn test_ranked_search_prompt_mentions_query_and_limit() {
        let prompt = ranked_search_prompt("NLP", &[candidate(3, "王五")], 20);
        assert!(prompt.contains("用户搜索：NLP"));
        assert!(prompt.contains("最多20条"));
        assert!(prompt.contains("id, reason"));
    }

    #[test]
    fn test_draft_email_joins_points() {
        let prompt = draft_email_prompt(
            DEFAULT_EMAIL_TOPIC,
            DEFAULT_EMAIL_AUDIENCE,
            DEFAULT_EMAIL_STYLE,
            &["时间：周六".to_string(), "地点：礼堂".to_string()],
        );
        assert!(prompt.contains("要点：时间：周六; 地点：礼堂"));
        assert!(prompt.contains("面向本校校友"));
    }
}

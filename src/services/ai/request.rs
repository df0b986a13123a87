//! Request assembly: conversation history replay plus the current turn.

use crate::session::types::{Attachment, ChatMessage, GenerationConfig};

use super::types::{
    Content, GenerateContentRequest, InlineData, Part, ThinkingConfig, WireGenerationConfig,
};

// The provider rejects empty text fields; an empty body is sent as a
// single space.
fn text_or_placeholder(text: &str) -> String {
    if text.is_empty() {
        " ".to_string()
    } else {
        text.to_string()
    }
}

/// Builds the provider payload for one user turn.
///
/// History is replayed text-only in order; attachments ride along on the
/// final user turn, stripped down to their raw base64 bodies.
pub fn build_request(
    query: &str,
    attachments: &[Attachment],
    history: &[ChatMessage],
    config: &GenerationConfig,
) -> GenerateContentRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|message| Content {
            role: message.role.wire_name().to_string(),
            parts: vec![Part::Text {
                text: text_or_placeholder(&message.content),
            }],
        })
        .collect();

    let mut parts = vec![Part::Text {
        text: text_or_placeholder(query),
    }];
    for attachment in attachments {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: attachment.mime_type.clone(),
                data: attachment.raw_base64().to_string(),
            },
        });
    }
    contents.push(Content {
        role: "user".to_string(),
        parts,
    });

    let system_instruction = (!config.system_instruction.is_empty()).then(|| Content {
        role: "system".to_string(),
        parts: vec![Part::Text {
            text: config.system_instruction.clone(),
        }],
    });

    GenerateContentRequest {
        contents,
        system_instruction,
        generation_config: WireGenerationConfig {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
            thinking_config: config
                .thinking_budget
                .map(|thinking_budget| ThinkingConfig { thinking_budget }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(content: &Content) -> &str {
        match &content.parts[0] {
            Part::Text { text } => text,
            Part::InlineData { .. } => panic!("expected a text part"),
        }
    }

    #[test]
    fn test_history_replayed_in_order() {
        let history = vec![
            ChatMessage::user("u1", Vec::new()),
            ChatMessage::model("m1"),
            ChatMessage::user("u2", Vec::new()),
        ];
        let request = build_request("next", &[], &history, &GenerationConfig::default());

        let roles: Vec<&str> = request.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user", "user"]);
        assert_eq!(text_of(&request.contents[0]), "u1");
        assert_eq!(text_of(&request.contents[1]), "m1");
        assert_eq!(text_of(&request.contents[2]), "u2");
        assert_eq!(text_of(&request.contents[3]), "next");
    }

    #[test]
    fn test_empty_query_with_attachment_is_valid() {
        let attachment = Attachment::from_bytes("shot.png", "image/png", b"pixels");
        let expected_body = attachment.raw_base64().to_string();
        let request = build_request(
            "",
            std::slice::from_ref(&attachment),
            &[],
            &GenerationConfig::default(),
        );

        let turn = request.contents.last().unwrap();
        assert_eq!(turn.parts.len(), 2);
        assert_eq!(
            turn.parts[0],
            Part::Text {
                text: " ".to_string()
            }
        );
        assert_eq!(
            turn.parts[1],
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: "image/png".to_string(),
                    data: expected_body,
                }
            }
        );
    }

    #[test]
    fn test_empty_history_text_gets_placeholder() {
        let message = ChatMessage::user("", Vec::new());
        let request = build_request("q", &[], &[message], &GenerationConfig::default());
        assert_eq!(text_of(&request.contents[0]), " ");
    }

    #[test]
    fn test_history_attachments_not_replayed() {
        let history = vec![ChatMessage::user(
            "earlier",
            vec![Attachment::from_bytes("old.png", "image/png", b"old")],
        )];
        let request = build_request("q", &[], &history, &GenerationConfig::default());
        assert_eq!(request.contents[0].parts.len(), 1);
    }

    #[test]
    fn test_thinking_config_omitted_when_unset() {
        let mut config = GenerationConfig::default();
        config.thinking_budget = None;
        let request = build_request("q", &[], &[], &config);
        let value = serde_json::to_value(&request).unwrap();
        assert!(value["generationConfig"].get("thinkingConfig").is_none());

        config.thinking_budget = Some(0);
        let request = build_request("q", &[], &[], &config);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["generationConfig"]["thinkingConfig"]["thinkingBudget"], 0);
    }

    #[test]
    fn test_generation_parameters_passed_through() {
        let config = GenerationConfig {
            temperature: 0.3,
            top_p: 0.5,
            top_k: 7,
            max_output_tokens: None,
            ..GenerationConfig::default()
        };
        let request = build_request("q", &[], &[], &config);
        let value = serde_json::to_value(&request).unwrap();
        let wire = &value["generationConfig"];
        assert_eq!(wire["topK"], 7);
        assert!(wire.get("maxOutputTokens").is_none());
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], config.system_instruction);
    }
}

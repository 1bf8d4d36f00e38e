//! Prompt construction for page generation.

use pagesmith_types::session::PublishRequest;

/// The structured prompt sent to a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub user_prompt: String,
}

impl GenerationRequest {
    /// Build the prompt for a completed wizard.
    pub fn for_page(request: &PublishRequest) -> Self {
        Self {
            system_instruction: system_instruction(request),
            user_prompt: format!(
                "Create a {} landing page for the channel '{}'.",
                request.page_type, request.channel_name
            ),
        }
    }
}

fn system_instruction(request: &PublishRequest) -> String {
    let mut prompt = format!(
        "You generate complete single-file HTML landing pages. Write one for a channel named \"{}\".\n\
         Requirements:\n\
         - Responsive layout styled with Tailwind CSS loaded from its CDN; no other external files.\n\
         - A centered header with the logo (logo.png), the channel title and a tagline.\n\
         - A call-to-action section with a button and a 15-second countdown timer.\n\
         - A content section with a heading and two paragraphs.\n\
         - A footer with a credit link.\n\
         - Dark background, vibrant contrasting colors, centered text.\n\
         - The button uses a multi-color gradient and a subtle breathing animation.\n",
        request.channel_name
    );

    if let Some(footer) = &request.footer_text {
        prompt.push_str(&format!("- The footer reads 'Ads by {footer}'.\n"));
    }

    prompt.push_str(request.page_type.style_hint());
    prompt.push('\n');
    prompt.push_str("Reply with the raw HTML document only: no commentary and no Markdown.");
    prompt
}

//! Prompt assembly for code generation.

use fresco_core::{Input, MediaSource, Message, Role};

/// System prompt framing the code generation task.
const SYSTEM_PROMPT: &str = "\
You are an expert Tailwind developer.
You take screenshots of a reference web page from the user, and then build single page apps
using Tailwind, HTML and JS.

- Make sure the app looks exactly like the screenshot.
- Pay close attention to background color, text color, font size, font family,
padding, margin, border, etc. Match the colors and sizes exactly.
- Use the exact text from the screenshot.
- Do not add comments in the code such as \"<!-- Add other navigation links as needed -->\"
in place of writing the full code. WRITE THE FULL CODE.
- Repeat elements as needed to match the screenshot. For example, if there are 15 items,
the code should have 15 items. DO NOT LEAVE comments like \"<!-- Repeat for each item -->\".
- For images, use placeholder images from https://placehold.co and include a detailed
description of the image in the alt text so that an image generation AI can generate
the image later.

In terms of libraries,

- Use this script to include Tailwind: <script src=\"https://cdn.tailwindcss.com\"></script>
- You can use Google Fonts
- Font Awesome for icons: <link rel=\"stylesheet\" href=\"https://cdnjs.cloudflare.com/ajax/libs/font-awesome/5.15.3/css/all.min.css\"></link>

Return only the full code in <html></html> tags.
Do not include markdown \"```\" or \"```html\" at the start or end.";

const USER_PROMPT: &str = "Generate code for a web page that looks exactly like this.";

/// Assembles the base prompt for a screenshot.
///
/// The screenshot travels as an image part ahead of the instruction text, in
/// the order the vision model expects to see them.
pub fn assemble_prompt(image_data_url: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::new(
            Role::User,
            vec![
                Input::Image {
                    mime: None,
                    source: MediaSource::Url(image_data_url.to_string()),
                },
                Input::Text(USER_PROMPT.to_string()),
            ],
        ),
    ]
}

/// Appends prior turns to the prompt: even history indices are assistant
/// completions, odd indices are user follow-ups, original order preserved.
pub fn append_history(messages: &mut Vec<Message>, history: &[String]) {
    for (index, text) in history.iter().enumerate() {
        let message = if index % 2 == 0 {
            Message::assistant(text.clone())
        } else {
            Message::user(text.clone())
        };
        messages.push(message);
    }
}

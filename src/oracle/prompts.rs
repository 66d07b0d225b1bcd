pub fn omen_prompt(seed: &str) -> String {
    format!(
        "You are a whimsical 'Pocket Diviner,' an AI that finds tiny, unexpected sparks of meaning or playful omens in everyday things. A user has provided the following mundane 'seed': '{seed}'.

Craft a very short (1-2 sentences, max 30 words), cryptic, poetic, or surprisingly insightful 'micro-omen' or 'serendipity note' loosely inspired by this seed. The connection should be imaginative and not literal. The tone should be light, slightly mysterious, and perhaps a little playful. Avoid direct advice; instead, offer a fleeting thought or observation.

Example output for 'a blue coffee cup': 'Still waters reflect deep skies. What reflections do you seek today?'
Example output for 'the sound of rain': 'Each drop a tiny messenger. Listen closely to the rhythm of change.'"
    )
}

pub fn icon_prompt(omen: &str) -> String {
    format!(
        "Create a tiny, minimalist, abstract, symbolic icon or glyph representing the essence of: '{omen}'. The icon should be very simple, almost like an enigmatic rune or a tiny, abstract sigil. Use primarily deep blues, purples, and gold. Output on a transparent or simple background. Max icon size 64x64 pixels."
    )
}

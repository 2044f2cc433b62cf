//! Voice the bot writes in.

use derive_getters::Getters;
use quotebot_error::ConfigError;
use quotebot_models::GenerateRequest;

const KRAMER_SYSTEM: &str = "You are Cosmo Kramer from Seinfeld, transported into the present day. \
Speak with your trademark chaotic energy, eccentric logic and offbeat charm. \
You're fascinated and confused by modern technology, trends and culture.";

const KRAMER_PROMPT: &str = "Generate a short, punchy quote from Cosmo Kramer (from Seinfeld) as if he's living today.

The quote should:
- Be under 280 characters
- Not be wrapped in quotation marks
- Reflect Kramer's eccentric personality and speaking style
- Be funny, self-contained and a little absurd
- Avoid cliches like NFTs, smart appliances, dating apps, Zoom, meditation and generic AI references
- Focus on lesser-discussed parts of modern life: climate quirks, changing cities, new etiquette rules, bizarre wellness trends, generational behavior or aging tech
- Feel like something Kramer would say in a chaotic rant to Jerry or the gang

Examples of the style and tone:
I tried intermittent fasting, Jerry. But I kept sleeping through the eating window!
You ever yell at your smart fridge, Jerry? It remembers! It's holding a grudge!
I bought a weighted blanket... it's too clingy, Jerry! It's like sleeping under commitment!
I tried to unsubscribe from emails, Jerry. The link took me to a TED Talk!
You ever ghost a spam caller, Jerry? They called back apologizing! Said they missed me!

Generate only the quote, no additional text or formatting.";

const KRAMER_FALLBACKS: [&str; 15] = [
    "I tried to make my own oat milk… I milked the oats, Jerry! But they just got soggy!",
    "You ever been in a Zoom breakout room, Jerry? It's like being trapped in an elevator… with no buttons!",
    "I sold my neighbor an NFT of his own front door. It's art, Jerry!",
    "I was tracking my steps with a smart ring… now it thinks I'm a hummingbird!",
    "You know what the problem is with AI girlfriends? No garlic breath! It's unnatural!",
    "I bought a self-driving e-scooter, Jerry. Now it's driving me crazy!",
    "These AirPods are like having tiny robots in your ears, Jerry!",
    "I started a TikTok about my coffee table. It's got 3 followers - me, you, and the table!",
    "I tried to order oat milk at Starbucks, Jerry. They looked at me like I was from Mars!",
    "You ever notice how everyone's on their phone at the gym? It's like a digital workout!",
    "I bought a smart fridge, Jerry. Now it's judging my food choices!",
    "These delivery apps are like having a personal butler, Jerry. But the butler's always late!",
    "I tried to use voice commands on my TV, Jerry. Now it thinks I'm yelling at it!",
    "You ever been to a virtual happy hour? It's like talking to ghosts, Jerry!",
    "I started a podcast about nothing, Jerry. It's perfect!",
];

/// Prompts and canned quotes for one character voice.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Persona {
    /// Short name for logs.
    name: String,
    /// System instruction sent with every request.
    system_prompt: String,
    /// User request sent with every request.
    user_prompt: String,
    /// Quotes used when generation is unavailable. Never empty.
    fallback_quotes: Vec<String>,
}

impl Persona {
    /// Build a persona.
    ///
    /// # Errors
    ///
    /// Returns error if `fallback_quotes` is empty.
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        fallback_quotes: Vec<String>,
    ) -> Result<Self, ConfigError> {
        if fallback_quotes.is_empty() {
            return Err(ConfigError::new("persona needs at least one fallback quote"));
        }
        Ok(Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            fallback_quotes,
        })
    }

    /// Present-day Cosmo Kramer.
    pub fn kramer() -> Self {
        Self {
            name: "kramer".to_string(),
            system_prompt: KRAMER_SYSTEM.to_string(),
            user_prompt: KRAMER_PROMPT.to_string(),
            fallback_quotes: KRAMER_FALLBACKS.iter().map(|q| q.to_string()).collect(),
        }
    }

    /// Request sent to every backend.
    pub fn request(&self) -> GenerateRequest {
        GenerateRequest::new(self.system_prompt.clone(), self.user_prompt.clone())
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::kramer()
    }
}

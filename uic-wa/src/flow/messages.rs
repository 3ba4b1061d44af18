//! Bot message texts
//!
//! Everything the user can receive outside of the step questions
//! themselves. French is the primary deployment language; English is
//! kept in parallel for the sandbox.

use uic_common::config::Language;

pub fn welcome(language: Language) -> &'static str {
    match language {
        Language::Fr => {
            "👋 Bienvenue au Générateur CIU!\n\n\
             Je vais vous poser 5 questions pour générer votre Code d'Identification Unique (CIU).\n\n\
             📋 Votre CIU est:\n\
             • Unique pour vous\n\
             • Privé et sécurisé\n\
             • Peut être régénéré si nécessaire\n\n\
             Tapez RESTART pour recommencer.\n\
             Tapez HELP pour de l'aide.\n\n\
             Commençons! 🚀"
        }
        Language::En => {
            "👋 Welcome to the UIC Generator!\n\n\
             I will ask you 5 questions to generate your Unique Identifier Code (UIC).\n\n\
             📋 Your UIC is:\n\
             • Unique to you\n\
             • Private and secure\n\
             • Can be regenerated if needed\n\n\
             Type RESTART anytime to start over.\n\
             Type HELP for assistance.\n\n\
             Let's begin! 🚀"
        }
    }
}

pub fn help(language: Language) -> &'static str {
    match language {
        Language::Fr => {
            "📖 Aide:\n\n\
             Commandes:\n\
             • RESTART - Recommencer depuis le début\n\
             • HELP - Afficher ce message\n\n\
             Je vais vous poser 5 questions pour générer votre CIU.\n\
             Répondez à chaque question et appuyez sur envoyer."
        }
        Language::En => {
            "📖 Help:\n\n\
             Commands:\n\
             • RESTART - Start over from the beginning\n\
             • HELP - Show this message\n\n\
             I will ask you 5 questions to generate your UIC.\n\
             Answer each question and press send."
        }
    }
}

pub fn acknowledgment(language: Language) -> &'static str {
    match language {
        Language::Fr => "✅ Compris!",
        Language::En => "✅ Got it!",
    }
}

/// Final message with the issued code, worded differently for new
/// vs. previously issued codes.
pub fn uic_delivered(language: Language, uic_code: &str, is_new: bool) -> String {
    match (language, is_new) {
        (Language::Fr, true) => format!(
            "🎉 Votre Code d'Identification Unique a été généré!\n\n\
             📋 Votre CIU:\n\
             ━━━━━━━━━━━━━━\n  {}\n━━━━━━━━━━━━━━\n\n\
             ✅ Ce code est maintenant enregistré à votre nom.\n\n\
             💡 Conservez ce code! Vous pouvez le redemander en démarrant une nouvelle conversation.\n\n\
             Tapez RESTART pour mettre à jour vos informations.",
            uic_code
        ),
        (Language::Fr, false) => format!(
            "📋 Votre CIU existant:\n\
             ━━━━━━━━━━━━━━\n  {}\n━━━━━━━━━━━━━━\n\n\
             ℹ️ Ce code a déjà été généré avec les mêmes informations.\n\n\
             Tapez RESTART si vous devez mettre à jour vos informations.",
            uic_code
        ),
        (Language::En, true) => format!(
            "🎉 Your Unique Identifier Code has been generated!\n\n\
             📋 Your UIC:\n\
             ━━━━━━━━━━━━━━\n  {}\n━━━━━━━━━━━━━━\n\n\
             ✅ This code is now registered in your name.\n\n\
             💡 Save this code! You can request it again by starting a new conversation.\n\n\
             Type RESTART to update your information.",
            uic_code
        ),
        (Language::En, false) => format!(
            "📋 Your existing UIC:\n\
             ━━━━━━━━━━━━━━\n  {}\n━━━━━━━━━━━━━━\n\n\
             ℹ️ This code was previously generated with the same information.\n\n\
             Type RESTART if you need to update your information.",
            uic_code
        ),
    }
}

/// Generic fallback when the engine fails; must never leak internals.
pub fn apology(language: Language) -> &'static str {
    match language {
        Language::Fr => {
            "❌ Désolé, une erreur s'est produite. Tapez RESTART pour réessayer ou contactez le support."
        }
        Language::En => {
            "❌ Sorry, an error occurred. Please type RESTART to try again or contact support."
        }
    }
}

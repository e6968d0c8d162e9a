//! Reply templates
//!
//! Recommendations are plain string templates over slot values. Absent slots
//! render with a literal default so a reply is always complete.

use super::state::{CollectedData, Slot};

const DEFAULT_FEELING: &str = "tranquilo";
const DEFAULT_BUDGET: &str = "un presupuesto flexible";
const DEFAULT_WHO: &str = "esa persona especial";
const DEFAULT_REASON: &str = "una ocasión especial";
const DEFAULT_TASTE: &str = "lo que más disfruta";

/// Budget menu options, keyed by the number the user answers with
const BUDGET_OPTIONS: &[(&str, &str)] = &[
    ("1", "menos de $300"),
    ("2", "entre $300 y $700"),
    ("3", "más de $700"),
];

/// Every message the bot can send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reply {
    Welcome,
    AskSelfGift,
    AskFeeling,
    AskOtherGift,
    YesNoReprompt,
    AskForWho,
    Goodbye,
    BudgetMenu,
    SelfRecommendation,
    RefineSelf,
    OfferOtherFlow,
    AskReason,
    OtherRecommendation,
    RefineOther,
    AskTasteSelf,
    AskTasteOther,
    RefinedSelfRecommendation,
    RefinedOtherRecommendation,
    ResetConfirmation,
    GreetingMidFlow,
    TextOnly,
    Apology,
}

impl Reply {
    /// Render against the slot values as they stand after the transition
    pub fn render(self, data: &CollectedData) -> String {
        match self {
            Reply::Welcome => {
                "¡Hola! 🎁 Soy tu asistente de regalos. Te ayudo a encontrar el detalle perfecto."
                    .to_string()
            }
            Reply::AskSelfGift => "¿El regalo es para ti? Responde *sí* o *no*.".to_string(),
            Reply::AskFeeling => {
                "¡Qué buena idea consentirte! ¿Cómo te sientes hoy? (por ejemplo: relajado, cansado, feliz)"
                    .to_string()
            }
            Reply::AskOtherGift => {
                "Entendido. ¿Buscas un regalo para alguien más? Responde *sí* o *no*.".to_string()
            }
            Reply::YesNoReprompt => {
                "Perdona, no te entendí 🙈. Respóndeme *sí* o *no*, porfa.".to_string()
            }
            Reply::AskForWho => {
                "¡Perfecto! ¿Para quién es el regalo? (por ejemplo: mi mamá, un amigo, mi pareja)"
                    .to_string()
            }
            Reply::Goodbye => {
                "¡Va! Cuando necesites un regalo aquí estaré. Escríbeme cuando quieras 👋".to_string()
            }
            Reply::BudgetMenu => budget_menu(),
            Reply::SelfRecommendation => format!(
                "Como te sientes {feeling} y tu presupuesto es {budget}, te recomiendo un kit de \
                 autocuidado: una vela aromática, un buen libro y tu snack favorito ✨",
                feeling = slot_or(data, Slot::Feeling, DEFAULT_FEELING),
                budget = budget_label(data.get(Slot::Budget)),
            ),
            Reply::RefineSelf => {
                "¿Quieres que afinemos la recomendación según tus gustos? Responde *sí* o *no*."
                    .to_string()
            }
            Reply::OfferOtherFlow => {
                "Sin problema. ¿Te ayudo a buscar un regalo para alguien más? Responde *sí* o *no*."
                    .to_string()
            }
            Reply::AskReason => {
                "¡Qué lindo! ¿Y cuál es el motivo del regalo? (cumpleaños, aniversario, solo porque sí...)"
                    .to_string()
            }
            Reply::OtherRecommendation => format!(
                "Para {who}, por {reason} y con un presupuesto de {budget}, te recomiendo una \
                 experiencia juntos o un detalle personalizado con su nombre 🎉",
                who = slot_or(data, Slot::Who, DEFAULT_WHO),
                reason = slot_or(data, Slot::Reason, DEFAULT_REASON),
                budget = budget_label(data.get(Slot::Budget)),
            ),
            Reply::RefineOther => {
                "¿Quieres que afinemos la recomendación según sus gustos? Responde *sí* o *no*."
                    .to_string()
            }
            Reply::AskTasteSelf => {
                "Cuéntame, ¿qué te gusta hacer en tu tiempo libre? (música, cocina, deporte...)"
                    .to_string()
            }
            Reply::AskTasteOther => {
                "Cuéntame, ¿qué le gusta a esa persona? (música, cocina, deporte...)".to_string()
            }
            Reply::RefinedSelfRecommendation => format!(
                "Si te sientes {feeling} y te gusta {taste}, un regalo ideal sería algo relacionado \
                 con {taste}: una clase, un accesorio o una suscripción 💫 ¡Disfrútalo!",
                feeling = slot_or(data, Slot::Feeling, DEFAULT_FEELING),
                taste = slot_or(data, Slot::Taste, DEFAULT_TASTE),
            ),
            Reply::RefinedOtherRecommendation => format!(
                "Para {who}, que disfruta {taste}, con {budget} puedes regalarle algo de {taste}: \
                 un accesorio, una experiencia o un libro sobre el tema 🎁 ¡Seguro le encanta!",
                who = slot_or(data, Slot::Who, DEFAULT_WHO),
                taste = slot_or(data, Slot::Taste, DEFAULT_TASTE),
                budget = budget_label(data.get(Slot::Budget)),
            ),
            Reply::ResetConfirmation => {
                "Listo, empezamos de nuevo 🔄. Escríbeme cualquier cosa para comenzar.".to_string()
            }
            Reply::GreetingMidFlow => {
                "¡Hola de nuevo! Seguimos donde nos quedamos. Si quieres empezar de cero escribe \
                 *reiniciar*, o responde la última pregunta para continuar."
                    .to_string()
            }
            Reply::TextOnly => {
                "Por ahora solo entiendo mensajes de texto 📝. ¿Me lo escribes, porfa?".to_string()
            }
            Reply::Apology => {
                "Ups, me perdí un poco 😅. Empecemos de nuevo: escríbeme cualquier cosa.".to_string()
            }
        }
    }
}

fn slot_or<'a>(data: &'a CollectedData, slot: Slot, default: &'a str) -> &'a str {
    data.get(slot).filter(|v| !v.is_empty()).unwrap_or(default)
}

fn budget_menu() -> String {
    let mut menu = String::from("¿Cuál es tu presupuesto? Responde con el número:");
    for (key, label) in BUDGET_OPTIONS {
        menu.push_str(&format!("\n{key}) {label}"));
    }
    menu
}

/// Render a budget answer, keeping the raw answer visible
fn budget_label(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|v| !v.is_empty()) else {
        return DEFAULT_BUDGET.to_string();
    };
    match BUDGET_OPTIONS.iter().find(|(key, _)| *key == raw) {
        Some((key, label)) => format!("la opción {key} ({label})"),
        None => raw.to_string(),
    }
}

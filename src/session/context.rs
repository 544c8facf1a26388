//! Lesson curriculum contexts and the opening instruction for the
//! agent's first turn.

use super::config::{LessonRef, SessionOptions};

/// Tutoring focus for a lesson, sent as the `context` field of every agent
/// request for that session.
pub fn lesson_context(lesson: &LessonRef) -> String {
    let context = match (lesson.unit_id, lesson.lesson_id) {
        (1, 1) => "Focus on core Arabic sounds and basic pronunciation. Help the student practice the most important phonetic elements.",
        (1, 2) => "Focus on present tense basics. Guide the student through using common verbs in present tense forms.",
        (1, 3) => "Focus on sentence structure and pronouns. Help the student with word order and simple sentence construction.",
        (1, 4) => "Focus on greetings and farewells. Help the student practice various greeting expressions for different situations.",
        (1, 5) => "Focus on fillers and speech flow. Teach the student how to sound more conversational with natural fillers.",
        (2, 6) => "Focus on introducing yourself. Help the student practice different self-introduction phrases.",
        (2, 7) => "Focus on talking about background. Help the student describe where they're from, their studies, or work.",
        (2, 8) => "Focus on describing yourself. Help the student describe personal qualities and characteristics.",
        (2, 9) => "Focus on asking about others. Teach the student how to inquire about someone else's life, work, or interests.",
        (2, 10) => "Focus on polite phrases and small talk. Guide the student through casual conversation topics.",
        (3, 11) => "Focus on talking about daily routine. Help the student describe their typical day activities.",
        (3, 12) => "Focus on rooms and house items. Teach vocabulary related to the home environment.",
        (3, 13) => "Focus on family members and living situation. Help the student talk about their family.",
        (3, 14) => "Focus on hobbies at home. Guide the student in discussing leisure activities they enjoy at home.",
        (3, 15) => "Focus on likes and dislikes. Help the student express preferences and opinions.",
        (4, 16) => "Focus on asking for directions. Teach the student how to navigate in an Arabic-speaking environment.",
        (4, 17) => "Focus on describing places. Help the student talk about locations and their characteristics.",
        (4, 18) => "Focus on running errands. Guide the student through common tasks like shopping and appointments.",
        (4, 19) => "Focus on visiting landmarks or popular spots. Teach vocabulary for discussing tourist attractions.",
        (4, 20) => "Focus on taxi or ride conversations. Help the student communicate effectively with drivers.",
        (5, 21) => "Focus on starting a conversation. Teach ice-breakers and conversation starters in Arabic.",
        (5, 22) => "Focus on talking about friends and hanging out. Help discuss social relationships and activities.",
        (5, 23) => "Focus on making and cancelling plans. Guide the student through scheduling interactions.",
        (5, 24) => "Focus on giving compliments. Teach culturally appropriate ways to compliment others.",
        (5, 25) => "Focus on agreeing and disagreeing politely. Help express opinions respectfully.",
        (6, 26) => "Focus on ordering food and drink. Teach restaurant and caf\u{e9} vocabulary and phrases.",
        (6, 27) => "Focus on grocery or market shopping. Help with vocabulary for food items and quantities.",
        (6, 28) => "Focus on describing taste. Teach expressions for food preferences and flavors.",
        (6, 29) => "Focus on bargaining and asking for prices. Guide through market negotiations.",
        (6, 30) => "Focus on talking about favorite foods. Help discuss culinary preferences and dishes.",
        (7, 31) => "Focus on using transport. Teach vocabulary for different transportation modes.",
        (7, 32) => "Focus on asking how to get somewhere. Help with directions and transportation questions.",
        (7, 33) => "Focus on talking about traffic or delays. Teach expressions for transportation issues.",
        (7, 34) => "Focus on buying tickets or renting vehicles. Guide through transportation transactions.",
        (7, 35) => "Focus on missed rides or getting lost. Help with problem-solving in travel situations.",
        (8, 36) => "Focus on talking about work or school. Teach vocabulary for professional and academic settings.",
        (8, 37) => "Focus on daily routines at work. Help discuss typical workplace activities.",
        (8, 38) => "Focus on making appointments or changes. Guide through scheduling conversations.",
        (8, 39) => "Focus on money, prices and budgeting. Teach financial vocabulary and expressions.",
        (8, 40) => "Focus on future plans and ambitions. Help discuss goals and aspirations.",
        (9, 41) => "Focus on feeling sick. Teach vocabulary for describing illness and discomfort.",
        (9, 42) => "Focus on at the pharmacy. Help with medicine-related vocabulary and requests.",
        (9, 43) => "Focus on medical emergencies. Teach essential emergency phrases.",
        (9, 44) => "Focus on explaining symptoms. Guide through health-related descriptions.",
        (9, 45) => "Focus on asking for help. Teach phrases for requesting assistance in various situations.",
        (10, 46) => "Focus on traditions and identity. Help discuss cultural practices and personal identity.",
        (10, 47) => "Focus on cultural celebrations and holidays. Teach vocabulary for festivities and customs.",
        (10, 48) => "Focus on expressing emotions. Guide through conveying feelings in Arabic.",
        (10, 49) => "Focus on telling stories and past experiences. Help with narrative expressions and past tense.",
        (10, 50) => "Focus on local sayings and proverbs. Teach common expressions and their cultural significance.",
        _ => {
            return format!(
                "Focus on lesson {} content. Guide the student through practicing relevant Arabic expressions.",
                lesson.lesson_id
            )
        }
    };
    context.to_string()
}

/// Resolve the context string for a session: an explicit custom context
/// wins, then the lesson curriculum, otherwise empty.
pub fn resolve_context(options: &SessionOptions) -> String {
    if let Some(custom) = &options.custom_context {
        return custom.clone();
    }
    options
        .lesson
        .as_ref()
        .map(lesson_context)
        .unwrap_or_default()
}

/// The instruction sent as the first turn so the agent speaks first.
pub fn opening_instruction(options: &SessionOptions) -> String {
    if options.custom_context.is_some() {
        if options.is_simulation {
            "Let's start our conversation practice.".to_string()
        } else {
            "Let's start our free conversation practice.".to_string()
        }
    } else if let Some(lesson) = &options.lesson {
        format!(
            "Start teaching lesson {} right away with energy and enthusiasm. Jump straight into a key phrase or concept.",
            lesson.lesson_id
        )
    } else {
        "Let's practice Arabic conversation with short, engaging exchanges.".to_string()
    }
}

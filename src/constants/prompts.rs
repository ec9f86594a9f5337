use once_cell::sync::Lazy;
use schemars::schema_for;

use crate::models::dto::llm_payloads::{GradePayload, SyllabusPayload};

static SYLLABUS_SCHEMA: Lazy<String> = Lazy::new(|| {
    serde_json::to_string_pretty(&schema_for!(SyllabusPayload)).unwrap_or_default()
});

static GRADE_SCHEMA: Lazy<String> = Lazy::new(|| {
    serde_json::to_string_pretty(&schema_for!(GradePayload)).unwrap_or_default()
});

/// Line placed before each uploaded document so the model can tell them apart. `ordinal` is 1-based.
pub fn document_header(ordinal: usize, name: &str) -> String {
    format!("\n\n--- INICIO DEL DOCUMENTO {}: {} ---\n", ordinal, name)
}

pub fn syllabus_prompt(notes: &str) -> String {
    format!(
        r#"Eres un tutor de excelencia para alumnos de 2º de Bachillerato. Con los apuntes que siguen vas a preparar un temario que pueda sustituir a los originales.

NORMAS:
1. UN TEMA POR DOCUMENTO: cada documento (o sección claramente separada) produce exactamente una entrada en "temas".
2. SIN RESUMIR: si el apunte menciona diez ideas, la explicación desarrolla las diez. Prohibido escribir "en resumen", "etcétera" o "entre otros".
3. EXTENSIÓN: cada explicación tiene al menos cuatro párrafos largos con fechas, nombres propios, datos técnicos y conectores lógicos tomados de los apuntes.
4. CLARIDAD: reformula lo difícil para que se entienda a la primera, sin perder el vocabulario técnico que se exige en el examen.
5. EVALUACIÓN: cada tema incluye exactamente dos preguntas, una de desarrollo y otra de relación de conceptos.

FORMATO DE SALIDA: un único objeto JSON, sin texto adicional:
{{
  "temas": [
    {{
      "titulo": "Título específico del tema",
      "explicacion": "Lección magistral extensa: antecedentes, desarrollo y consecuencias.",
      "preguntas": ["Pregunta de desarrollo", "Pregunta de relación"]
    }}
  ]
}}

ESQUEMA JSON:
{schema}

APUNTES:
{notes}
"#,
        schema = SYLLABUS_SCHEMA.as_str(),
        notes = notes
    )
}

pub fn grading_prompt(questions: &str, answer: &str, reference: &str) -> String {
    format!(
        r#"Actúa como corrector de Selectividad del máximo nivel. Tu objetivo es que el alumno pase del aprobado a la excelencia.

CRITERIOS:
1. RIGOR: ¿faltan matices técnicos o vocabulario propio de los apuntes?
2. ESTRUCTURA: ¿la respuesta está bien hilada o es una lista de ideas sueltas?
3. EL CAMINO AL 10: señala exactamente qué dato, detalle o relación falta para la nota perfecta.

CONTEXTO DE REFERENCIA:
{reference}

PREGUNTAS:
{questions}

RESPUESTA DEL ALUMNO:
{answer}

Responde EXCLUSIVAMENTE con un objeto JSON con esta forma (nota entre 0 y 10):
{{
  "nota": 0.0,
  "feedback": "Análisis crítico de la respuesta.",
  "olvidos": "Datos o conceptos clave omitidos.",
  "como_llegar_al_10": "Qué términos añadir, qué frases mejorar y qué matiz incluir."
}}

ESQUEMA JSON:
{schema}
"#,
        reference = reference,
        questions = questions,
        answer = answer,
        schema = GRADE_SCHEMA.as_str()
    )
}

pub fn simplify_prompt(explanation: &str) -> String {
    format!(
        "Explica esto de la forma más sencilla posible, como a alguien que no ha entendido nada: {}",
        explanation
    )
}

pub fn chat_prompt(explanation: &str, question: &str) -> String {
    format!(
        "Eres un tutor. Resuelve la duda del alumno sobre este tema concreto.\n\nTEMA:\n{}\n\nDUDA DEL ALUMNO:\n{}",
        explanation, question
    )
}

pub fn checklist_prompt(explanation: &str) -> String {
    format!(
        "A partir de este tema, enumera los 5 conceptos o datos exactos que más se preguntan en el examen. Sé muy breve.\n\nTEMA:\n{}",
        explanation
    )
}

pub fn final_exam_question(title: &str) -> String {
    format!("Desarrolle el siguiente tema: {}", title)
}

pub fn final_exam_grading_prompt(question: &str, answer: &str, reference: &str) -> String {
    format!(
        "Corrige este examen de Selectividad como lo haría el tribunal. Da una nota sobre 10 y justifica qué sobra, qué falta y cómo mejorarlo.\n\nEXAMEN: {}\n\nRESPUESTA:\n{}\n\nREFERENCIA:\n{}",
        question, answer, reference
    )
}

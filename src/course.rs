//! A short course on saving money, one lesson per page.

use axum::{
    extract::Query,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    endpoints,
    html::{CARD_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// A page of the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lesson {
    pub title: &'static str,
    pub content: &'static str,
}

pub const LESSONS: [Lesson; 10] = [
    Lesson {
        title: "Bem-vindo ao Minicurso!",
        content: "Vamos dar o primeiro passo para uma vida financeira mais saudável. O objetivo? \
            Aprender a poupar uma parte do seu salário todos os meses.",
    },
    Lesson {
        title: "Por que poupar?",
        content: "Poupar cria uma reserva de emergência, permite realizar sonhos (como uma viagem \
            ou um carro) e é o primeiro passo para investir e fazer o seu dinheiro render.",
    },
    Lesson {
        title: "A Meta: 5%, 10% ou 20%",
        content: "A sua primeira meta pode ser poupar 5% do seu salário. Se o seu salário é \
            R$ 3.000, isso significa R$ 150 por mês. Parece pouco, mas é um começo poderoso!",
    },
    Lesson {
        title: "Como começar: O Orçamento",
        content: "Anote TODAS as suas despesas por um mês. Use a Conta Fácil para isso! Você vai \
            descobrir para onde o seu dinheiro realmente está a ir.",
    },
    Lesson {
        title: "Identificando Cortes",
        content: "Depois de analisar o seu orçamento, veja onde pode cortar. Aquele café diário? \
            A assinatura que não usa? Pequenos cortes somam muito no final do ano.",
    },
    Lesson {
        title: "Aumentando a Meta: 10%",
        content: "Conseguiu poupar 5%? Ótimo! Agora, tente aumentar para 10%. Com um salário de \
            R$ 3.000, isso são R$ 300 por mês. Em um ano, são R$ 3.600!",
    },
    Lesson {
        title: "O poder dos 20%",
        content: "Poupar 20% acelera drasticamente os seus objetivos. São R$ 600 por mês, ou \
            R$ 7.200 por ano. Isso pode ser a entrada para um imóvel ou um grande investimento.",
    },
    Lesson {
        title: "Automatize a sua Poupança",
        content: "A melhor forma de garantir que você vai poupar é automatizar. Configure uma \
            transferência automática para uma conta poupança assim que receber o seu salário.",
    },
    Lesson {
        title: "Pague-se Primeiro",
        content: "Não espere o fim do mês para ver o que sobrou. A sua poupança deve ser a \
            primeira conta a ser paga. Trate-a como uma despesa fixa obrigatória.",
    },
    Lesson {
        title: "Continue a jornada",
        content: "Este é só o começo. Continue a aprender sobre finanças, investimentos e como \
            fazer o seu dinheiro trabalhar para você. A consistência é a chave do sucesso!",
    },
];

/// Where the user is in the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseProgress {
    /// Reading the lesson with this 1-based page number.
    Reading(usize),
    /// Finished the last lesson.
    Completed,
}

impl CourseProgress {
    /// Pages below one show the first lesson, pages after the last lesson show the completion message.
    pub fn for_page(page: Option<usize>) -> Self {
        match page.unwrap_or(1) {
            0 => CourseProgress::Reading(1),
            page if page <= LESSONS.len() => CourseProgress::Reading(page),
            _ => CourseProgress::Completed,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseQuery {
    pub page: Option<usize>,
}

fn course_page_url(page: usize) -> String {
    format!("{}?page={page}", endpoints::COURSE_VIEW)
}

pub async fn get_course_page(Query(query): Query<CourseQuery>) -> Response {
    let content = match CourseProgress::for_page(query.page) {
        CourseProgress::Reading(page) => lesson_view(page),
        CourseProgress::Completed => completed_view(),
    };

    course_view(&content).into_response()
}

fn course_view(content: &Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::COURSE_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class={"max-w-lg " (PAGE_CONTAINER_STYLE)}
        {
            section id="course" class={"flex flex-col min-h-[350px] " (CARD_STYLE)}
            {
                (content)
            }
        }
    };

    base("Minicurso", &[], &content)
}

fn lesson_view(page: usize) -> Markup {
    let lesson_count = LESSONS.len();
    let lesson = &LESSONS[page.clamp(1, lesson_count) - 1];
    let progress = page * 100 / lesson_count;
    let is_last = page == lesson_count;
    let nav_button_style = "py-2 px-4 rounded-lg";

    html! {
        div class="flex-1"
        {
            h2 class="text-2xl font-bold mb-2" { (lesson.title) }
            p class="text-lg text-gray-600 dark:text-gray-300" { (lesson.content) }
        }

        div class="mt-8"
        {
            div class="w-full bg-gray-200 rounded-full h-2.5 mb-4"
            {
                div
                    id="course-progress"
                    class="bg-blue-600 h-2.5 rounded-full"
                    style=(format!("width: {progress}%"))
                {}
            }

            div class="flex justify-between items-center"
            {
                @if page > 1 {
                    a
                        href=(course_page_url(page - 1))
                        class={(nav_button_style) " bg-gray-200 text-gray-800 hover:bg-gray-300"}
                    {
                        "Anterior"
                    }
                } @else {
                    span class={(nav_button_style) " bg-gray-200 text-gray-800 opacity-50"} { "Anterior" }
                }

                span class="text-sm font-semibold text-gray-500"
                {
                    "Página " (page) " de " (lesson_count)
                }

                a
                    href=(course_page_url(page + 1))
                    class={(nav_button_style) " font-semibold text-white \
                        bg-gradient-to-r from-blue-500 to-purple-600 hover:opacity-90"}
                {
                    @if is_last { "Concluir" } @else { "Próximo" }
                }
            }
        }
    }
}

fn completed_view() -> Markup {
    html! {
        div class="flex-1 text-center"
        {
            h2 class="text-2xl font-bold text-green-600 mb-4" { "Parabéns!" }
            p class="text-gray-700 dark:text-gray-300 mb-6"
            {
                "Você já deu o primeiro passo que muitos brasileiros não têm coragem de dar."
            }
            a
                href=(endpoints::DASHBOARD_VIEW)
                class="py-2 px-6 font-semibold text-white rounded-lg \
                    bg-gradient-to-r from-blue-500 to-purple-600 hover:opacity-90"
            {
                "Fechar"
            }
        }
    }
}

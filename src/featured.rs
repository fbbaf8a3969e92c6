//! Featured topics: hand-written quizzes served without a model call.
//!
//! Each topic is addressable by id or by a loose topic phrase
//! ("black hole", "machine learning", ...).

use serde::Serialize;

use crate::domain::{Quiz, QuizQuestion};
use crate::scoring::quiz_total_xp;

pub struct FeaturedQuestion {
  pub question: &'static str,
  pub options: &'static [&'static str],
  pub correct_index: usize,
  pub explanation: &'static str,
}

#[derive(Serialize)]
pub struct FeaturedTopic {
  pub id: &'static str,
  pub title: &'static str,
  pub icon: &'static str,
  pub description: &'static str,
  #[serde(skip)]
  pub quiz_title: &'static str,
  #[serde(skip)]
  pub questions: &'static [FeaturedQuestion],
}

impl FeaturedTopic {
  pub fn quiz(&self) -> Quiz {
    Quiz {
      title: self.quiz_title.to_string(),
      questions: self
        .questions
        .iter()
        .map(|q| QuizQuestion {
          question: q.question.into(),
          options: q.options.iter().map(|o| o.to_string()).collect(),
          correct_index: q.correct_index,
          explanation: q.explanation.into(),
        })
        .collect(),
      total_xp: quiz_total_xp(self.questions.len()),
    }
  }
}

pub static FEATURED: &[FeaturedTopic] = &[
  FeaturedTopic {
    id: "python",
    title: "Learn Python",
    icon: "🐍",
    description: "Master the world's most popular programming language!",
    quiz_title: "Python Programming",
    questions: &[
      FeaturedQuestion {
        question: "Who created Python?",
        options: &["Guido van Rossum", "Mark Zuckerberg", "Elon Musk", "Bill Gates"],
        correct_index: 0,
        explanation: "Guido van Rossum created Python in 1991!",
      },
      FeaturedQuestion {
        question: "What does Python use to define code blocks?",
        options: &["Indentation (spaces/tabs)", "Curly braces {}", "Parentheses ()", "Square brackets []"],
        correct_index: 0,
        explanation: "Python uses indentation to define code blocks, making it visually clean!",
      },
      FeaturedQuestion {
        question: "How do you display output in Python?",
        options: &["print()", "echo()", "display()", "show()"],
        correct_index: 0,
        explanation: "print() is the function used to display output in Python!",
      },
      FeaturedQuestion {
        question: "Which symbol is used for comments in Python?",
        options: &["#", "//", "/*", "--"],
        correct_index: 0,
        explanation: "The # symbol starts a comment in Python!",
      },
      FeaturedQuestion {
        question: "How do you create a list in Python?",
        options: &["[1, 2, 3]", "{1, 2, 3}", "(1, 2, 3)", "<1, 2, 3>"],
        correct_index: 0,
        explanation: "Lists use square brackets: [1, 2, 3]",
      },
    ],
  },
  FeaturedTopic {
    id: "black_holes",
    title: "Explore Black Holes",
    icon: "🌌",
    description: "Journey to space's most mysterious objects!",
    quiz_title: "Black Holes",
    questions: &[
      FeaturedQuestion {
        question: "What is the event horizon?",
        options: &["The boundary from which nothing can escape", "The center of a black hole", "A type of star", "A galaxy"],
        correct_index: 0,
        explanation: "The event horizon is the invisible boundary—cross it, and there's no return!",
      },
      FeaturedQuestion {
        question: "What is at the center of a black hole?",
        options: &["A singularity", "A star", "Empty space", "A planet"],
        correct_index: 0,
        explanation: "The singularity is an infinitely dense point where all the mass is concentrated!",
      },
      FeaturedQuestion {
        question: "When was the first black hole photographed?",
        options: &["2019", "1915", "2000", "1969"],
        correct_index: 0,
        explanation: "The first image of a black hole (M87) was captured in 2019!",
      },
      FeaturedQuestion {
        question: "Why are black holes black?",
        options: &["Light cannot escape them", "They're made of dark matter", "They absorb all colors", "They're very cold"],
        correct_index: 0,
        explanation: "Black holes are black because their gravity is so strong that even light cannot escape!",
      },
      FeaturedQuestion {
        question: "How massive is the black hole at our galaxy's center?",
        options: &["4 million times the Sun's mass", "4 times the Sun's mass", "400 times the Sun's mass", "4 billion times the Sun's mass"],
        correct_index: 0,
        explanation: "Sagittarius A* is about 4 million times the mass of our Sun!",
      },
    ],
  },
  FeaturedTopic {
    id: "dinosaurs",
    title: "Dinosaur Discovery",
    icon: "🦖",
    description: "Meet Earth's ancient rulers!",
    quiz_title: "Dinosaurs",
    questions: &[
      FeaturedQuestion {
        question: "How long did dinosaurs rule Earth?",
        options: &["Over 165 million years", "65 million years", "1 million years", "1 billion years"],
        correct_index: 0,
        explanation: "Dinosaurs dominated Earth for an incredible 165+ million years!",
      },
      FeaturedQuestion {
        question: "What caused the dinosaur extinction?",
        options: &["An asteroid impact", "A volcanic eruption", "Climate change alone", "A disease"],
        correct_index: 0,
        explanation: "A 6-mile wide asteroid struck Earth 65 million years ago, creating a catastrophic extinction event!",
      },
      FeaturedQuestion {
        question: "Which animals are living dinosaurs today?",
        options: &["Birds", "Crocodiles", "Lizards", "Snakes"],
        correct_index: 0,
        explanation: "Birds are direct descendants of theropod dinosaurs—they're living dinosaurs!",
      },
      FeaturedQuestion {
        question: "When did dinosaurs first appear?",
        options: &["230 million years ago", "65 million years ago", "1 billion years ago", "1 million years ago"],
        correct_index: 0,
        explanation: "Dinosaurs first appeared during the Triassic Period, about 230 million years ago!",
      },
      FeaturedQuestion {
        question: "What was special about T. rex's bite?",
        options: &["12,800 pounds of force", "Could breathe fire", "Was venomous", "Had no teeth"],
        correct_index: 0,
        explanation: "T. rex had one of the strongest bites ever—12,800 pounds of crushing force!",
      },
    ],
  },
  FeaturedTopic {
    id: "dna",
    title: "DNA & Genetics",
    icon: "🧬",
    description: "Unlock life's instruction manual!",
    quiz_title: "DNA & Genetics",
    questions: &[
      FeaturedQuestion {
        question: "What does DNA stand for?",
        options: &["Deoxyribonucleic Acid", "Dynamic Nuclear Atom", "Dual Nitrogen Amplifier", "Digital Nucleic Array"],
        correct_index: 0,
        explanation: "DNA stands for Deoxyribonucleic Acid!",
      },
      FeaturedQuestion {
        question: "Which bases pair together in DNA?",
        options: &["A-T and G-C", "A-G and T-C", "A-C and G-T", "All bases pair with each other"],
        correct_index: 0,
        explanation: "Adenine pairs with Thymine (A-T) and Guanine pairs with Cytosine (G-C)!",
      },
      FeaturedQuestion {
        question: "What shape is DNA?",
        options: &["Double helix", "Single strand", "Triple helix", "Circular"],
        correct_index: 0,
        explanation: "DNA forms a twisted ladder shape called a double helix!",
      },
      FeaturedQuestion {
        question: "How much of your DNA is identical to other humans?",
        options: &["99.9%", "50%", "75%", "25%"],
        correct_index: 0,
        explanation: "99.9% of human DNA is identical—we're all incredibly similar!",
      },
      FeaturedQuestion {
        question: "What technology allows precise gene editing?",
        options: &["CRISPR", "DNA printer", "Gene scanner", "Mutation detector"],
        correct_index: 0,
        explanation: "CRISPR is a revolutionary gene-editing technology!",
      },
    ],
  },
  FeaturedTopic {
    id: "ai",
    title: "Introduction to AI",
    icon: "🤖",
    description: "Discover how machines think!",
    quiz_title: "Introduction to AI",
    questions: &[
      FeaturedQuestion {
        question: "Who is considered the father of AI?",
        options: &["Alan Turing", "Steve Jobs", "Bill Gates", "Mark Zuckerberg"],
        correct_index: 0,
        explanation: "Alan Turing's work on machine intelligence laid the foundation for AI!",
      },
      FeaturedQuestion {
        question: "What is Machine Learning?",
        options: &["Teaching computers through examples", "Programming every rule manually", "Building robot bodies", "Creating video games"],
        correct_index: 0,
        explanation: "Machine Learning trains computers on examples so they learn patterns automatically!",
      },
      FeaturedQuestion {
        question: "What are neural networks inspired by?",
        options: &["The human brain", "Computer chips", "The internet", "Electrical grids"],
        correct_index: 0,
        explanation: "Neural networks are inspired by how neurons connect in the human brain!",
      },
      FeaturedQuestion {
        question: "What type of AI can beat humans at chess but can't do other tasks?",
        options: &["Narrow AI", "General AI", "Super AI", "Basic AI"],
        correct_index: 0,
        explanation: "Narrow AI excels at specific tasks but can't generalize to other domains!",
      },
      FeaturedQuestion {
        question: "How does Machine Learning differ from traditional programming?",
        options: &["It learns from data instead of explicit rules", "It's faster", "It uses more code", "It's older technology"],
        correct_index: 0,
        explanation: "ML learns patterns from data rather than following pre-written rules!",
      },
    ],
  },
];

pub fn by_id(id: &str) -> Option<&'static FeaturedTopic> {
  FEATURED.iter().find(|t| t.id == id)
}

/// Resolve a free-form topic to a featured id.
pub fn match_topic(topic: &str) -> Option<&'static str> {
  let t = topic.trim().to_lowercase();
  let any = |needles: &[&str]| needles.iter().any(|n| t.contains(n));

  if any(&["python"]) {
    Some("python")
  } else if any(&["black hole", "blackhole", "explore black"]) {
    Some("black_holes")
  } else if any(&["dinosaur", "dino"]) {
    Some("dinosaurs")
  } else if any(&["dna", "genetic"]) {
    Some("dna")
  } else if any(&["artificial intelligence", "machine learning", "introduction to ai"]) || t == "ai" || t == "ml" {
    Some("ai")
  } else {
    None
  }
}

/// Exact id first, then topic matching.
pub fn lookup(key: &str) -> Option<&'static FeaturedTopic> {
  by_id(key).or_else(|| match_topic(key).and_then(by_id))
}

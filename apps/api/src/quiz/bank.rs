//! The built-in English course: ten levels of ten multiple-choice questions,
//! from greetings up to everyday situations.

use serde::Serialize;

pub const QUESTIONS_PER_LEVEL: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    pub answer: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub number: u8,
    pub title: &'static str,
    pub questions: [Question; QUESTIONS_PER_LEVEL],
}

/// A question as sent to the client: no answer.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub prompt: &'static str,
    pub options: [&'static str; 4],
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelSummary {
    pub level: u8,
    pub title: &'static str,
    pub question_count: usize,
}

const fn q(prompt: &'static str, options: [&'static str; 4], answer: &'static str) -> Question {
    Question {
        prompt,
        options,
        answer,
    }
}

pub static LEVELS: [Level; 10] = [
    Level {
        number: 1,
        title: "Basics (Greetings & Simple Words)",
        questions: [
            q("How do you say 'Hello' in English?", ["Hola", "Bonjour", "Hello", "Ciao"], "Hello"),
            q("'Goodbye' means:", ["See you", "Please", "Thank you", "Sorry"], "See you"),
            q("'Thank you' shows:", ["Asking", "Gratitude", "Angry", "Sleep"], "Gratitude"),
            q("Which word means 'Yes'?", ["No", "Yes", "Maybe", "Why"], "Yes"),
            q("Which word means 'No'?", ["Yes", "No", "Please", "Thanks"], "No"),
            q("How do you greet someone in the morning?", ["Good Night", "Good Morning", "Good Evening", "Goodbye"], "Good Morning"),
            q("How do you greet at night?", ["Good Morning", "Good Evening", "Good Night", "Hello"], "Good Night"),
            q("Which word means 'Sorry'?", ["Thank you", "Sorry", "Hello", "Goodbye"], "Sorry"),
            q("If someone helps you, you say:", ["Please", "Thanks", "No", "Hello"], "Thanks"),
            q("When asking politely, you say:", ["Please", "Go", "Yes", "Hi"], "Please"),
        ],
    },
    Level {
        number: 2,
        title: "Numbers & Colors",
        questions: [
            q("What is 'One'?", ["1", "2", "3", "4"], "1"),
            q("What is 'Two'?", ["2", "5", "8", "10"], "2"),
            q("What is 'Five'?", ["2", "5", "7", "9"], "5"),
            q("What is 'Ten'?", ["8", "10", "12", "20"], "10"),
            q("What color is the sky?", ["Blue", "Red", "Green", "Black"], "Blue"),
            q("What color is grass?", ["Red", "Yellow", "Green", "White"], "Green"),
            q("What color is blood?", ["Yellow", "Red", "Blue", "Pink"], "Red"),
            q("What color is milk?", ["White", "Blue", "Brown", "Black"], "White"),
            q("Banana is usually:", ["Yellow", "Blue", "Purple", "Red"], "Yellow"),
            q("Grass + Sky = ?", ["Red & Blue", "Blue & Green", "White & Yellow", "Black & Red"], "Blue & Green"),
        ],
    },
    Level {
        number: 3,
        title: "Everyday Objects",
        questions: [
            q("What do you sit on?", ["Chair", "Table", "Book", "Bag"], "Chair"),
            q("What do you write in?", ["Chair", "Book", "Bag", "Cup"], "Book"),
            q("What do you drink water from?", ["Cup", "Chair", "Pen", "Bag"], "Cup"),
            q("What do you carry to school?", ["Bag", "Chair", "Table", "Cup"], "Bag"),
            q("Which object helps you write?", ["Pen", "Book", "Cup", "Bag"], "Pen"),
            q("What do you read?", ["Book", "Bag", "Cup", "Chair"], "Book"),
            q("Which one is furniture?", ["Chair", "Pen", "Cup", "Bag"], "Chair"),
            q("What do you sleep on?", ["Bed", "Chair", "Table", "Book"], "Bed"),
            q("What shows you time?", ["Clock", "Cup", "Chair", "Book"], "Clock"),
            q("What do you use to eat rice?", ["Spoon", "Cup", "Pen", "Bag"], "Spoon"),
        ],
    },
    Level {
        number: 4,
        title: "Everyday Words",
        questions: [
            q("Choose the fruit:", ["Apple", "Chair", "Run", "Blue"], "Apple"),
            q("Choose the animal:", ["Dog", "Table", "Book", "Pen"], "Dog"),
            q("Choose the color:", ["Red", "Book", "Chair", "Run"], "Red"),
            q("Choose the place:", ["School", "Dog", "Eat", "Blue"], "School"),
            q("Choose the object:", ["Table", "Run", "Happy", "Eat"], "Table"),
            q("Choose the action:", ["Run", "Pen", "Chair", "Book"], "Run"),
            q("Choose the drink:", ["Water", "Chair", "Book", "Red"], "Water"),
            q("Choose the emotion:", ["Happy", "Table", "Apple", "Run"], "Happy"),
            q("Choose the vehicle:", ["Bus", "Pen", "Book", "Eat"], "Bus"),
            q("Choose the family member:", ["Mother", "Table", "Run", "Chair"], "Mother"),
        ],
    },
    Level {
        number: 5,
        title: "Simple Sentences",
        questions: [
            q("I ___ a book.", ["read", "red", "blue", "run"], "read"),
            q("She ___ water.", ["drinks", "pen", "table", "blue"], "drinks"),
            q("They ___ football.", ["play", "apple", "run", "chair"], "play"),
            q("He ___ to school.", ["goes", "book", "dog", "eat"], "goes"),
            q("We ___ happy.", ["are", "pen", "run", "chair"], "are"),
            q("The sun ___ hot.", ["is", "blue", "book", "pen"], "is"),
            q("I ___ ten years old.", ["am", "dog", "chair", "eat"], "am"),
            q("You ___ my friend.", ["are", "book", "pen", "blue"], "are"),
            q("The dog ___ fast.", ["runs", "pen", "eat", "chair"], "runs"),
            q("We ___ dinner.", ["eat", "blue", "pen", "chair"], "eat"),
        ],
    },
    Level {
        number: 6,
        title: "Present Continuous",
        questions: [
            q("I ___ reading a book.", ["am", "is", "are", "be"], "am"),
            q("She ___ playing football.", ["is", "am", "are", "be"], "is"),
            q("They ___ eating lunch.", ["are", "am", "is", "be"], "are"),
            q("We ___ going to school.", ["are", "am", "is", "be"], "are"),
            q("He ___ writing homework.", ["is", "am", "are", "be"], "is"),
            q("The children ___ running.", ["are", "is", "am", "be"], "are"),
            q("I ___ cooking food.", ["am", "is", "are", "be"], "am"),
            q("She ___ singing a song.", ["is", "am", "are", "be"], "is"),
            q("We ___ playing cricket.", ["are", "am", "is", "be"], "are"),
            q("He ___ watching TV.", ["is", "am", "are", "be"], "is"),
        ],
    },
    Level {
        number: 7,
        title: "Past Tense Basics",
        questions: [
            q("I ___ to school yesterday.", ["go", "went", "gone", "going"], "went"),
            q("She ___ a book last night.", ["reads", "read", "reading", "reads"], "read"),
            q("They ___ football last week.", ["play", "played", "playing", "plays"], "played"),
            q("We ___ pizza yesterday.", ["eat", "ate", "eaten", "eating"], "ate"),
            q("He ___ a song on stage.", ["sing", "sang", "sung", "singing"], "sang"),
            q("The teacher ___ the lesson.", ["teach", "teaches", "taught", "teaching"], "taught"),
            q("I ___ a movie last weekend.", ["watch", "watched", "watching", "watches"], "watched"),
            q("They ___ to the park.", ["go", "went", "gone", "going"], "went"),
            q("She ___ her homework.", ["do", "did", "done", "doing"], "did"),
            q("We ___ happy to see him.", ["was", "were", "is", "are"], "were"),
        ],
    },
    Level {
        number: 8,
        title: "Future Tense Basics",
        questions: [
            q("I ___ go tomorrow.", ["will", "did", "was", "had"], "will"),
            q("She ___ study tonight.", ["will", "was", "did", "had"], "will"),
            q("They ___ visit us next week.", ["will", "were", "did", "has"], "will"),
            q("We ___ play cricket tomorrow.", ["will", "did", "was", "had"], "will"),
            q("He ___ come to school later.", ["will", "was", "did", "had"], "will"),
            q("The teacher ___ explain again.", ["will", "was", "did", "has"], "will"),
            q("I ___ call you soon.", ["will", "did", "was", "had"], "will"),
            q("We ___ meet at 5 pm.", ["will", "did", "was", "has"], "will"),
            q("She ___ finish homework later.", ["will", "was", "did", "had"], "will"),
            q("They ___ travel next year.", ["will", "were", "did", "has"], "will"),
        ],
    },
    Level {
        number: 9,
        title: "Simple Conversations",
        questions: [
            q("How are you? — I am ___", ["fine", "apple", "run", "chair"], "fine"),
            q("What is your name? — My name is ___", ["book", "John", "table", "happy"], "John"),
            q("Where do you live? — I live in ___", ["city", "cat", "eat", "pen"], "city"),
            q("What do you like? — I like ___", ["reading", "sleep", "blue", "yes"], "reading"),
            q("Do you like apples? — Yes, I ___", ["do", "am", "was", "will"], "do"),
            q("What time is it? — It is ___", ["3 o'clock", "apple", "pen", "go"], "3 o'clock"),
            q("How old are you? — I am ___ years old.", ["ten", "eat", "book", "yes"], "ten"),
            q("Do you play cricket? — Yes, I ___", ["do", "am", "was", "will"], "do"),
            q("Can you help me? — Yes, I ___", ["can", "am", "was", "will"], "can"),
            q("Where are you going? — I am going to ___", ["school", "pen", "sleep", "eat"], "school"),
        ],
    },
    Level {
        number: 10,
        title: "Everyday Situations",
        questions: [
            q("You are hungry. You say: ___", ["I want food", "I am sleep", "I am red", "I go run"], "I want food"),
            q("You are thirsty. You say: ___", ["I want water", "I am pen", "I am ten", "I go read"], "I want water"),
            q("You feel sick. You say: ___", ["I need a doctor", "I need a pen", "I am chair", "I go school"], "I need a doctor"),
            q("You want to buy something. You say: ___", ["How much is this?", "Where are you?", "What time is it?", "I am happy"], "How much is this?"),
            q("You want help. You say: ___", ["Please help me", "I am food", "Where pen", "I go run"], "Please help me"),
            q("You want to find the toilet. You ask: ___", ["Where is the toilet?", "How are you?", "What color?", "I am chair"], "Where is the toilet?"),
            q("You want to pay. You say: ___", ["Here is money", "I am fine", "I go home", "What is this"], "Here is money"),
            q("You are lost. You ask: ___", ["Can you show me the way?", "I am table", "What pen", "I eat food"], "Can you show me the way?"),
            q("You want to sit. You say: ___", ["Can I sit here?", "What is time?", "I am pen", "Go school"], "Can I sit here?"),
            q("You meet a new person. You say: ___", ["Nice to meet you", "I am run", "What book", "I go red"], "Nice to meet you"),
        ],
    },
];

/// Levels are numbered from 1.
pub fn level(number: u8) -> Option<&'static Level> {
    LEVELS.iter().find(|l| l.number == number)
}

impl Level {
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn summary(&self) -> LevelSummary {
        LevelSummary {
            level: self.number,
            title: self.title,
            question_count: self.questions.len(),
        }
    }

    pub fn views(&self) -> Vec<QuestionView> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionView {
                index,
                prompt: question.prompt,
                options: question.options,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_shape() {
        assert_eq!(LEVELS.len(), 10);
        for (i, level) in LEVELS.iter().enumerate() {
            assert_eq!(level.number as usize, i + 1);
            for question in &level.questions {
                assert!(
                    question.options.contains(&question.answer),
                    "answer missing from options: {}",
                    question.prompt
                );
            }
        }
    }

    #[test]
    fn test_level_lookup() {
        assert_eq!(level(1).map(|l| l.title), Some("Basics (Greetings & Simple Words)"));
        assert_eq!(level(10).map(|l| l.title), Some("Everyday Situations"));
        assert!(level(0).is_none());
        assert!(level(11).is_none());
    }

    #[test]
    fn test_views_hide_answers() {
        let views = level(2).unwrap().views();
        assert_eq!(views.len(), QUESTIONS_PER_LEVEL);
        let json = serde_json::to_value(&views[0]).unwrap();
        assert!(json.get("answer").is_none());
        assert_eq!(json["index"], 0);
    }
}

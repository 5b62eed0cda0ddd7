//! Scripted replies used when the AI model is unavailable.

/// Reply used when no topic matches.
pub const DEFAULT_REPLY: &str = "I'm here to help with orders, payments, deliveries, \
selling on Souk and your account. Could you tell me a bit more about what you need? \
You can also reach our support team from the Contact page.";

/// Topics in match order. The first topic with a keyword in the message wins.
const TOPICS: &[(&[&str], &str)] = &[
    (
        &["refund", "return", "money back", "cancel"],
        "If an item arrives damaged or not as described, open the order under \
         My Account > Orders and contact the seller within 7 days. Approved refunds \
         go back to your original payment method through Paystack.",
    ),
    (
        &["track", "where is my order", "order status", "my order"],
        "You can track your orders under My Account > Orders. Each order shows its \
         current status, from processing to delivered. Guests can use the link in \
         their confirmation email.",
    ),
    (
        &["pay", "card", "paystack", "transfer", "checkout"],
        "Payments are processed securely by Paystack. You can pay with card, bank \
         transfer or USSD at checkout. Your card details never touch our servers.",
    ),
    (
        &["deliver", "shipping", "ship", "arrive"],
        "Delivery times depend on the seller's location and yours, usually 2 to 7 \
         working days. The delivery fee is shown at checkout before you pay.",
    ),
    (
        &["boost", "promote", "feature my", "platinum", "gold", "silver"],
        "Sellers can boost products into the Platinum, Gold or Silver sections from \
         the seller dashboard under Boost Requests. Pick the products and dates and \
         an admin reviews the request.",
    ),
    (
        &["subscription", "plan", "upgrade"],
        "Seller subscription plans are listed in the seller dashboard under \
         Subscription. Plans are billed through Paystack and unlock more listings \
         and promotion options.",
    ),
    (
        &["sell", "seller", "vendor", "open a store", "my store"],
        "To start selling, choose Sell on Souk and fill in the seller registration \
         form with your store details. Once an admin approves your store you can \
         list products from the seller dashboard.",
    ),
    (
        &["password", "login", "log in", "sign in", "account", "sign up", "register"],
        "You can sign in or create an account from the Login page. If you forgot \
         your password, use the Forgot Password link to reset it by email.",
    ),
    (
        &["contact", "support", "phone", "email", "human", "agent"],
        "You can reach our support team through the Contact page or by email. We \
         usually reply within one working day.",
    ),
    (
        &["hello", "hi", "hey", "good morning", "good afternoon", "good evening"],
        "Hello! Welcome to Souk. How can I help you today?",
    ),
];

/// Pick a scripted reply for `message` by keyword.
#[must_use]
pub fn fallback_reply(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    TOPICS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| matches_keyword(&lower, &words, k)))
        .map_or(DEFAULT_REPLY, |(_, reply)| *reply)
}

/// Single words match word prefixes ("delivery" matches "deliver"); phrases
/// match anywhere in the message.
fn matches_keyword(lower: &str, words: &[&str], keyword: &str) -> bool {
    if keyword.contains(' ') {
        lower.contains(keyword)
    } else if keyword.len() <= 3 {
        words.contains(&keyword)
    } else {
        words.iter().any(|w| w.starts_with(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting() {
        assert!(fallback_reply("Hi there").starts_with("Hello!"));
        assert!(fallback_reply("hey").starts_with("Hello!"));
    }

    #[test]
    fn test_short_keywords_need_whole_words() {
        // "this" contains "hi" but is not a greeting
        assert_eq!(fallback_reply("what is this"), DEFAULT_REPLY);
    }

    #[test]
    fn test_topics() {
        assert!(fallback_reply("Where is my order?").contains("My Account > Orders"));
        assert!(fallback_reply("How do I get a refund").contains("refund"));
        assert!(fallback_reply("Can I pay with transfer?").contains("Paystack"));
        assert!(fallback_reply("When will delivery happen").contains("working days"));
        assert!(fallback_reply("how do I boost my products").contains("Boost Requests"));
        assert!(fallback_reply("I want to become a seller").contains("seller registration"));
        assert!(fallback_reply("I forgot my password").contains("Forgot Password"));
        assert!(fallback_reply("How can I contact support").contains("Contact page"));
    }

    #[test]
    fn test_topic_order() {
        // refund outranks order tracking
        assert!(fallback_reply("hello, I want to return my order").contains("7 days"));
    }

    #[test]
    fn test_default_reply() {
        assert_eq!(fallback_reply("asdf qwerty"), DEFAULT_REPLY);
        assert_eq!(fallback_reply(""), DEFAULT_REPLY);
    }
}

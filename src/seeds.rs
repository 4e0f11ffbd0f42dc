//! Built-in problem bank: six short Python snippets with injected defects.
//!
//! Code texts are kept byte-for-byte (including blank lines with trailing
//! indentation) because judging compares them after trimming only.

use crate::domain::Problem;

/// The problems every deployment ships with, in a stable order.
pub fn seed_problems() -> Vec<Problem> {
  vec![
    Problem {
      id: "Even-Odd Checker".into(),
      buggy_code: r##"
def check_even_odd(num)
    if num / 2 == 0:
        return "Even"
    else
        return "Odd"
        
# Test the function
print(check_even_odd(4))
"##.into(),
      hints: vec![
        "Check the function definition syntax".into(),
        "Division vs Modulo operator".into(),
        "Missing colon in else statement".into(),
      ],
      solution: r##"
def check_even_odd(num):
    if num % 2 == 0:
        return "Even"
    else:
        return "Odd"
        
# Test the function
print(check_even_odd(4))
"##.into(),
    },
    Problem {
      id: "Binary Search".into(),
      buggy_code: r##"
def binary_search(arr, target):
    left = 0
    right = len(arr)
    
    while left <= right:
        mid = (left + right) / 2
        if arr[mid] == target:
            return mid
        elif arr[mid] < target:
            left = mid + 1
        else:
            right = mid - 1
    
    return -1

# Test the function
arr = [1, 2, 3, 4, 5]
print(binary_search(arr, 3))
"##.into(),
      hints: vec![
        "Check the right pointer initialization".into(),
        "Integer division vs float division".into(),
        "Array index out of bounds possible".into(),
      ],
      solution: r##"
def binary_search(arr, target):
    left = 0
    right = len(arr) - 1
    
    while left <= right:
        mid = (left + right) // 2
        if arr[mid] == target:
            return mid
        elif arr[mid] < target:
            left = mid + 1
        else:
            right = mid - 1
    
    return -1

# Test the function
arr = [1, 2, 3, 4, 5]
print(binary_search(arr, 3))
"##.into(),
    },
    Problem {
      id: "List Reversal".into(),
      buggy_code: r##"
def reverse_list(lst):
    for i in range(len(lst)):
        lst[i], lst[len(lst) - i] = lst[len(lst) - i], lst[i]
    return lst

# Test the function
test_list = [1, 2, 3, 4, 5]
print(reverse_list(test_list))
"##.into(),
      hints: vec![
        "Think about the list indexing".into(),
        "Consider how many swaps you really need".into(),
        "Watch out for the index out of range error".into(),
      ],
      solution: r##"
def reverse_list(lst):
    for i in range(len(lst) // 2):
        lst[i], lst[len(lst) - 1 - i] = lst[len(lst) - 1 - i], lst[i]
    return lst

# Test the function
test_list = [1, 2, 3, 4, 5]
print(reverse_list(test_list))
"##.into(),
    },
    Problem {
      id: "Fibonacci Sequence".into(),
      buggy_code: r##"
def fibonacci(n):
    if n <= 0:
        return []
    elif n == 1:
        return [0]
    
    sequence = [0, 1]
    while len(sequence) <= n:
        sequence.append(sequence[-1] + sequence[-2])
    return sequence

# Test the function
print(fibonacci(5))
"##.into(),
      hints: vec![
        "Check the loop condition".into(),
        "Think about the sequence length vs n".into(),
        "Consider the expected output length".into(),
      ],
      solution: r##"
def fibonacci(n):
    if n <= 0:
        return []
    elif n == 1:
        return [0]
    
    sequence = [0, 1]
    while len(sequence) < n:
        sequence.append(sequence[-1] + sequence[-2])
    return sequence

# Test the function
print(fibonacci(5))
"##.into(),
    },
    Problem {
      id: "Palindrome Check".into(),
      buggy_code: r##"
def is_palindrome(text):
    text = text.lower()
    return text == text[::-1]

# Test the function
print(is_palindrome("A man, a plan, a canal: Panama"))
"##.into(),
      hints: vec![
        "What about spaces and punctuation?".into(),
        "Consider string cleaning".into(),
        "Think about special characters".into(),
      ],
      solution: r##"
def is_palindrome(text):
    text = ''.join(char.lower() for char in text if char.isalnum())
    return text == text[::-1]

# Test the function
print(is_palindrome("A man, a plan, a canal: Panama"))
"##.into(),
    },
    Problem {
      id: "Find Missing Number".into(),
      buggy_code: r##"
def find_missing(arr):
    n = len(arr)
    expected_sum = n * (n + 1) / 2
    actual_sum = sum(arr)
    return expected_sum - actual_sum

# Test the function
print(find_missing([0, 1, 3, 4, 5]))
"##.into(),
      hints: vec![
        "Check the formula for sum of n numbers".into(),
        "Think about the array length vs range".into(),
        "Consider the actual range of numbers".into(),
      ],
      solution: r##"
def find_missing(arr):
    n = len(arr) + 1
    expected_sum = n * (n - 1) // 2
    actual_sum = sum(arr)
    return expected_sum - actual_sum

# Test the function
print(find_missing([0, 1, 3, 4, 5]))
"##.into(),
    },
  ]
}
